//! Custom error types for datastation

use thiserror::Error;

/// Main error type for datastation operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot open file {path}: {message}")]
    FileAccess { path: String, message: String },

    #[error("Unreadable spreadsheet: {0}")]
    Format(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn file_access(path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        Error::FileAccess {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

/// Constraint failures reported by SQLite become `Constraint`, everything
/// else coming out of sqlx means the store could not be used at all.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let is_constraint = !matches!(db_err.kind(), sqlx::error::ErrorKind::Other)
                || db_err.message().contains("constraint failed");
            if is_constraint {
                return Error::Constraint(db_err.message().to_string());
            }
        }
        Error::Connection(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for datastation
pub type Result<T> = std::result::Result<T, Error>;
