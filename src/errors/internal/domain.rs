use thiserror::Error;

use super::DatabaseError;

/// Failures inside domain actions.
///
/// `Validation` and `NotFound` carry messages safe to show to the caller
/// in a `{success: false, error}` result. `Database` is logged and
/// replaced with a generic message before it leaves the process.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        DomainError::Database(DatabaseError::operation(operation, source))
    }

    /// Message suitable for the caller. Storage failures collapse to the
    /// provided generic text; the detail stays in the server log.
    pub fn caller_message(&self, generic: &str) -> String {
        match self {
            DomainError::Validation(_) | DomainError::NotFound(_) => self.to_string(),
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!(error = %self, "domain action failed");
                generic.to_string()
            }
        }
    }
}
