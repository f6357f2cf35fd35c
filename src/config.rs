//! Startup configuration, read once from the command line or environment.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("store uri must not be empty")]
    EmptyStoreUri,

    #[error("database name must be a non-empty file stem, got {0:?}")]
    InvalidDbName(String),
}

/// Command-line arguments for attendanced
#[derive(Parser, Debug, Clone)]
#[command(name = "attendanced")]
#[command(about = "Class roster and attendance sidecar")]
#[command(version)]
pub struct Args {
    /// Store connection string: `:memory:`, `sqlite::memory:`, `sqlite://<dir>` or a directory
    #[arg(long, env = "ATTENDANCE_STORE_URI")]
    pub store_uri: String,

    /// Database name; the file `<dir>/<name>.sqlite3` inside the store directory
    #[arg(long, env = "ATTENDANCE_DB_NAME", default_value = "attendance")]
    pub db_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    pub fn describe(&self) -> String {
        match self {
            StoreLocation::Memory => ":memory:".to_string(),
            StoreLocation::File(p) => p.to_string_lossy().to_string(),
        }
    }
}

impl Args {
    pub fn store_location(&self) -> Result<StoreLocation, ConfigError> {
        let uri = self.store_uri.trim();
        if uri.is_empty() {
            return Err(ConfigError::EmptyStoreUri);
        }
        if uri == ":memory:" || uri == "sqlite::memory:" {
            return Ok(StoreLocation::Memory);
        }

        let name = self.db_name.trim();
        let has_separator = name.contains(|c: char| c == '/' || c == '\\');
        if name.is_empty() || has_separator || name == "." || name == ".." {
            return Err(ConfigError::InvalidDbName(self.db_name.clone()));
        }

        let dir = uri.strip_prefix("sqlite://").unwrap_or(uri);
        if dir.is_empty() {
            return Err(ConfigError::EmptyStoreUri);
        }
        Ok(StoreLocation::File(
            PathBuf::from(dir).join(format!("{}.sqlite3", name)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(uri: &str, db: &str) -> Args {
        Args {
            store_uri: uri.to_string(),
            db_name: db.to_string(),
        }
    }

    #[test]
    fn memory_uris() {
        assert_eq!(args(":memory:", "x").store_location(), Ok(StoreLocation::Memory));
        assert_eq!(
            args("sqlite::memory:", "").store_location(),
            Ok(StoreLocation::Memory)
        );
    }

    #[test]
    fn directory_uris_join_db_name() {
        assert_eq!(
            args("sqlite:///var/lib/att", "school").store_location(),
            Ok(StoreLocation::File(PathBuf::from("/var/lib/att/school.sqlite3")))
        );
        assert_eq!(
            args("data", "attendance").store_location(),
            Ok(StoreLocation::File(PathBuf::from("data/attendance.sqlite3")))
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            args("  ", "attendance").store_location(),
            Err(ConfigError::EmptyStoreUri)
        );
        assert_eq!(
            args("sqlite://", "attendance").store_location(),
            Err(ConfigError::EmptyStoreUri)
        );
        assert_eq!(
            args("data", "../escape").store_location(),
            Err(ConfigError::InvalidDbName("../escape".to_string()))
        );
        assert_eq!(
            args("data", "").store_location(),
            Err(ConfigError::InvalidDbName(String::new()))
        );
    }

    #[test]
    fn args_parse_from_flags() {
        let a = Args::try_parse_from(["attendanced", "--store-uri", ":memory:"]).expect("parse");
        assert_eq!(a.db_name, "attendance");
        assert_eq!(a.store_uri, ":memory:");
    }
}
