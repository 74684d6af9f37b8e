// Common test utilities for integration tests

use std::sync::Arc;

use gymdesk_backend::auth::Role;
use gymdesk_backend::stores::ActivityLogStore;
use gymdesk_backend::types::internal::Session;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates an activity log store on the given database
pub fn activity_store(db: &DatabaseConnection) -> Arc<ActivityLogStore> {
    Arc::new(ActivityLogStore::new(db.clone()))
}

/// A session for the given role carrying that role's default
/// permission set
pub fn session_with_role(role: Role) -> Session {
    Session {
        user_id: format!("test-{}", role.as_str().to_lowercase()),
        name: "Test User".to_string(),
        email: "test@gym.test".to_string(),
        role,
        permissions: role.default_permissions().to_vec(),
        avatar: None,
    }
}
