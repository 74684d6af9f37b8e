// Errors layer - error type definitions
pub mod auth;
pub mod internal;

// Re-exports for convenience
pub use auth::AuthError;
pub use internal::{DatabaseError, DomainError, InternalError};
