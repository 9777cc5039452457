//! SQLite-backed todo storage.
//!
//! A single `Connection` sits behind a mutex; every operation locks it for
//! its whole read-modify-write, so there is exactly one writer at a time.
//! Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT` and are never handed
//! out twice, even after the newest row is deleted.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreError;
use crate::types::{CreateTodo, ReplaceTodo, Todo, UpdateTodo};

const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS todos (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT    NOT NULL,
        description TEXT,
        completed   INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL
    );",
)];

const SELECT_COLUMNS: &str = "SELECT id, title, description, completed, created_at, updated_at FROM todos";

const SAMPLES: &[(&str, &str, bool)] = &[
    ("Buy groceries", "Milk, Bread, Eggs", false),
    ("Read a book", "Finish reading 'Atomic Habits'", true),
];

#[derive(Clone, Debug)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open (or create) the store file at `path` and bring its schema up to
    /// date. Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened todo store");
        Self::bootstrap(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(mut conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // The connection carries no state a panicking holder could leave
    // half-written, so a poisoned lock is still usable.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let title = validate_title(&input.title)?;
        let description = normalize_description(input.description);
        let now = timestamp(Utc::now());

        let conn = self.conn();
        conn.execute(
            "INSERT INTO todos (title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, description, input.completed, now],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, "created todo");
        fetch(&conn, id)
    }

    /// All todos in ascending id order.
    pub fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt
            .query_map([], TodoRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(TodoRow::into_todo).collect()
    }

    pub fn get(&self, id: i64) -> Result<Todo, StoreError> {
        fetch(&self.conn(), id)
    }

    /// Apply the fields present in `patch`; everything else keeps its value.
    pub fn update(&self, id: i64, patch: UpdateTodo) -> Result<Todo, StoreError> {
        let conn = self.conn();
        let current = fetch(&conn, id)?;

        let title = match patch.title {
            Some(Some(title)) => validate_title(&title)?,
            Some(None) => return Err(StoreError::Validation("title must not be null".to_string())),
            None => current.title,
        };
        let description = match patch.description {
            Some(description) => normalize_description(description),
            None => current.description,
        };
        let completed = patch.completed.unwrap_or(current.completed);

        write(&conn, id, &title, description.as_deref(), completed)?;
        tracing::info!(id, "updated todo");
        fetch(&conn, id)
    }

    /// Overwrite every mutable field of an existing todo.
    pub fn replace(&self, id: i64, input: ReplaceTodo) -> Result<Todo, StoreError> {
        let conn = self.conn();
        fetch(&conn, id)?;
        let title = validate_title(&input.title)?;
        let description = normalize_description(input.description);

        write(&conn, id, &title, description.as_deref(), input.completed)?;
        tracing::info!(id, "replaced todo");
        fetch(&conn, id)
    }

    pub fn toggle(&self, id: i64) -> Result<Todo, StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE todos SET completed = NOT completed, updated_at = ?1 WHERE id = ?2",
            params![timestamp(Utc::now()), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, "toggled todo");
        fetch(&conn, id)
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn()
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, "deleted todo");
        Ok(())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::Database(rusqlite::Error::IntegralValueOutOfRange(0, count)))
    }

    /// Insert the sample todos if the store is empty. Returns how many rows
    /// were written.
    pub fn seed_samples(&self) -> Result<usize, StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let now = timestamp(Utc::now());
        for (title, description, completed) in SAMPLES {
            tx.execute(
                "INSERT INTO todos (title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![title, description, completed, now],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = SAMPLES.len(), "seeded sample todos");
        Ok(SAMPLES.len())
    }
}

fn run_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT    NOT NULL
        )",
        [],
    )?;

    let applied: Vec<i64> = {
        let mut stmt = tx.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let versions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        versions
    };

    for (version, sql) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, timestamp(Utc::now())],
        )?;
        tracing::debug!(version, "applied schema migration");
    }

    tx.commit()?;
    Ok(())
}

fn fetch(conn: &Connection, id: i64) -> Result<Todo, StoreError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        TodoRow::from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound(id))?
    .into_todo()
}

fn write(
    conn: &Connection,
    id: i64,
    title: &str,
    description: Option<&str>,
    completed: bool,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE todos SET title = ?1, description = ?2, completed = ?3, updated_at = ?4 WHERE id = ?5",
        params![title, description, completed, timestamp(Utc::now()), id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, StoreError> {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(at) => Ok(at.with_timezone(&Utc)),
        Err(source) => Err(StoreError::Timestamp { value, source }),
    }
}

/// Raw column values; timestamps are parsed outside the rusqlite callback so
/// a bad value surfaces as `StoreError::Timestamp`.
struct TodoRow {
    id: i64,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: String,
    updated_at: String,
}

impl TodoRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            completed: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_todo(self) -> Result<Todo, StoreError> {
        Ok(Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: parse_timestamp(self.created_at)?,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}
