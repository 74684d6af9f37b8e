use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::types::db::activity_log;

/// Append-only trail of staff mutations.
///
/// Writes are best-effort: a failed log entry is reported to the server
/// log and never fails the action that triggered it.
pub struct ActivityLogStore {
    db: DatabaseConnection,
}

impl ActivityLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record(
        &self,
        user_id: &str,
        action: &str,
        entity: &str,
        entity_id: &str,
        details: serde_json::Value,
    ) {
        let entry = activity_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(user_id.to_string()),
            action: Set(action.to_string()),
            entity: Set(entity.to_string()),
            entity_id: Set(entity_id.to_string()),
            details: Set(details.to_string()),
            created_at: Set(Utc::now().timestamp()),
        };

        if let Err(e) = entry.insert(&self.db).await {
            tracing::warn!(error = %e, entity, action, "failed to write activity log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, EntityTrait};
    use serde_json::json;

    #[tokio::test]
    async fn record_persists_an_entry() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let store = ActivityLogStore::new(db.clone());
        store
            .record("user-1", "CREATE", "Lead", "lead-1", json!({"name": "Jane Doe"}))
            .await;

        let rows = activity_log::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, "CREATE");
        assert_eq!(rows[0].entity, "Lead");
        assert!(rows[0].details.contains("Jane Doe"));
    }
}
