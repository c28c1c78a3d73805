//! Record store error types.

use bastion_common::BastionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<DbError> for BastionError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => BastionError::NotFound(what),
            other => BastionError::Fetch(other.to_string()),
        }
    }
}
