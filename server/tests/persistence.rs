//! On-disk behaviour of `TodoStore`: records survive reopening the file and
//! ids keep counting up across sessions.

use todo_server::{CreateTodo, StoreError, TodoStore, UpdateTodo};

#[test]
fn todos_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let created = {
        let store = TodoStore::open(&path).unwrap();
        let created = store.create(CreateTodo::new("Buy milk")).unwrap();
        store
            .update(
                created.id,
                UpdateTodo {
                    completed: Some(true),
                    ..UpdateTodo::default()
                },
            )
            .unwrap()
    };

    let reopened = TodoStore::open(&path).unwrap();
    assert_eq!(reopened.get(created.id).unwrap(), created);
    assert_eq!(reopened.count().unwrap(), 1);
}

#[test]
fn deleted_ids_stay_retired_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    {
        let store = TodoStore::open(&path).unwrap();
        let todo = store.create(CreateTodo::new("temporary")).unwrap();
        assert_eq!(todo.id, 1);
        store.delete(todo.id).unwrap();
    }

    let store = TodoStore::open(&path).unwrap();
    assert!(matches!(store.get(1), Err(StoreError::NotFound(1))));
    let next = store.create(CreateTodo::new("next")).unwrap();
    assert_eq!(next.id, 2);
}

#[test]
fn open_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("todo.db");

    let store = TodoStore::open(&path).unwrap();
    store.create(CreateTodo::new("hello")).unwrap();
    assert!(path.exists());
}

#[test]
fn clones_share_one_store() {
    let store = TodoStore::open_in_memory().unwrap();
    let handle = store.clone();

    let threads: Vec<_> = (0..4)
        .map(|i| {
            let store = handle.clone();
            std::thread::spawn(move || {
                for j in 0..5 {
                    store.create(CreateTodo::new(format!("todo {i}-{j}"))).unwrap();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    let todos = store.list().unwrap();
    assert_eq!(todos.len(), 20);
    let mut ids: Vec<_> = todos.iter().map(|t| t.id).collect();
    ids.dedup();
    assert_eq!(ids, (1..=20).collect::<Vec<i64>>());
}
