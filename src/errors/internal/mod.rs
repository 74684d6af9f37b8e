use thiserror::Error;

pub mod database;
pub mod domain;

pub use database::DatabaseError;
pub use domain::DomainError;

/// Internal error type for startup and infrastructure operations.
/// Not exposed via the API.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Config error: {key}: {message}")]
    Config { key: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::operation(operation, source))
    }

    pub fn config(key: &str, message: impl Into<String>) -> InternalError {
        InternalError::Config {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
