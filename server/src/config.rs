//! Runtime configuration read from the process environment.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_PATH: &str = "todo.db";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Server settings.
///
/// | variable            | default                 |
/// |---------------------|-------------------------|
/// | `PORT`              | `3001`                  |
/// | `SQLITE_DB`         | `todo.db`               |
/// | `CORS_ORIGIN`       | `http://localhost:3000` |
/// | `SEED_SAMPLE_TODOS` | off                     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub cors_origin: String,
    pub seed_samples: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            seed_samples: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset and empty
    /// variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) => port,
                Err(source) => return Err(ConfigError::InvalidPort { value, source }),
            },
            None => defaults.port,
        };

        Ok(Self {
            port,
            db_path: get("SQLITE_DB").map(PathBuf::from).unwrap_or(defaults.db_path),
            cors_origin: get("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            seed_samples: get("SEED_SAMPLE_TODOS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
