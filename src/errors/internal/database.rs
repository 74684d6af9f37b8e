use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl DatabaseError {
    pub fn operation(operation: &str, source: sea_orm::DbErr) -> Self {
        DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        }
    }
}
