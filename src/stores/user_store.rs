use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{Permission, Role};
use crate::errors::DomainError;
use crate::services::password;
use crate::stores::ActivityLogStore;
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::Session;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub permissions: Option<Vec<Permission>>,
    pub phone: Option<String>,
    /// When present the password is re-hashed; otherwise left alone.
    pub password: Option<String>,
}

/// Staff accounts, trainers included (a trainer is a user with the
/// TRAINER role). Accounts are soft-deleted via the active flag and
/// never hard-deleted while referenced.
pub struct UserStore {
    db: DatabaseConnection,
    password_pepper: String,
    activity: Arc<ActivityLogStore>,
}

impl UserStore {
    pub fn new(db: DatabaseConnection, password_pepper: String, activity: Arc<ActivityLogStore>) -> Self {
        Self {
            db,
            password_pepper,
            activity,
        }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, DomainError> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_users", e))
    }

    pub async fn get(&self, id: &str) -> Result<Option<user::Model>, DomainError> {
        User::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_user", e))
    }

    pub async fn list_trainers(&self) -> Result<Vec<user::Model>, DomainError> {
        User::find()
            .filter(user::Column::Role.eq(Role::Trainer.as_str()))
            .filter(user::Column::Active.eq(true))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_trainers", e))
    }

    pub async fn create(&self, session: &Session, data: NewUser) -> Result<user::Model, DomainError> {
        let duplicate = User::find()
            .filter(user::Column::Email.eq(data.email.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("check_user_email", e))?;
        if duplicate.is_some() {
            return Err(DomainError::validation("Email already in use"));
        }

        let password_hash = password::hash_password(&self.password_pepper, &data.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let now = Utc::now().timestamp();
        let record = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(data.name),
            email: Set(data.email),
            password_hash: Set(password_hash),
            role: Set(data.role.as_str().to_string()),
            permissions: Set(Permission::to_json(&data.permissions)),
            phone: Set(data.phone),
            avatar: Set(None),
            active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_user", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE_USER",
                "User",
                &created.id,
                json!({"name": created.name, "email": created.email, "role": created.role}),
            )
            .await;

        Ok(created)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        data: UserUpdate,
    ) -> Result<user::Model, DomainError> {
        let existing = self.get(id).await?.ok_or(DomainError::NotFound("User"))?;

        if let Some(email) = &data.email {
            let taken = User::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("check_user_email", e))?;
            if taken.is_some_and(|u| u.id != id) {
                return Err(DomainError::validation("Email already in use"));
            }
        }

        let mut record: user::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(email) = data.email {
            record.email = Set(email);
        }
        if let Some(role) = data.role {
            record.role = Set(role.as_str().to_string());
        }
        if let Some(permissions) = data.permissions {
            record.permissions = Set(Permission::to_json(&permissions));
        }
        if let Some(phone) = data.phone {
            record.phone = Set(Some(phone));
        }
        if let Some(new_password) = data.password {
            let hash = password::hash_password(&self.password_pepper, &new_password)
                .map_err(|e| DomainError::Internal(e.to_string()))?;
            record.password_hash = Set(hash);
        }
        record.updated_at = Set(Utc::now().timestamp());

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_user", e))?;

        self.activity
            .record(&session.user_id, "UPDATE_USER", "User", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    /// Soft delete: the account is deactivated, never removed, so
    /// foreign references (members' trainer, payment creator) stay
    /// intact. An inactive account can no longer authenticate.
    pub async fn deactivate(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self.get(id).await?.ok_or(DomainError::NotFound("User"))?;
        let name = existing.name.clone();
        let email = existing.email.clone();

        let mut record: user::ActiveModel = existing.into();
        record.active = Set(false);
        record.updated_at = Set(Utc::now().timestamp());
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("deactivate_user", e))?;

        self.activity
            .record(
                &session.user_id,
                "DELETE_USER",
                "User",
                id,
                json!({"name": name, "email": email}),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> UserStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        UserStore::new(db, "test-pepper".to_string(), activity)
    }

    fn admin_session() -> Session {
        Session {
            user_id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@gym.test".to_string(),
            role: Role::Admin,
            permissions: Vec::new(),
            avatar: None,
        }
    }

    fn trainer_account(email: &str) -> NewUser {
        NewUser {
            name: "John Trainer".to_string(),
            email: email.to_string(),
            password: "trainer123".to_string(),
            role: Role::Trainer,
            permissions: Vec::new(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn create_hashes_password_and_stores_role() {
        let store = setup().await;
        let created = store
            .create(&admin_session(), trainer_account("coach@gym.test"))
            .await
            .unwrap();

        assert_eq!(created.role, "TRAINER");
        assert!(created.active);
        assert!(created.password_hash.starts_with("$argon2"));
        assert_ne!(created.password_hash, "trainer123");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = setup().await;
        store
            .create(&admin_session(), trainer_account("coach@gym.test"))
            .await
            .unwrap();
        let result = store
            .create(&admin_session(), trainer_account("coach@gym.test"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_can_rotate_the_password() {
        let store = setup().await;
        let created = store
            .create(&admin_session(), trainer_account("coach@gym.test"))
            .await
            .unwrap();

        let updated = store
            .update(
                &admin_session(),
                &created.id,
                UserUpdate {
                    password: Some("new-password".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.password_hash, created.password_hash);
        assert!(password::verify_password("test-pepper", "new-password", &updated.password_hash));
    }

    #[tokio::test]
    async fn update_rejects_email_taken_by_another_user() {
        let store = setup().await;
        let session = admin_session();
        store.create(&session, trainer_account("a@gym.test")).await.unwrap();
        let second = store.create(&session, trainer_account("b@gym.test")).await.unwrap();

        let result = store
            .update(
                &session,
                &second.id,
                UserUpdate {
                    email: Some("a@gym.test".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn deactivate_keeps_the_record_but_marks_it_inactive() {
        let store = setup().await;
        let created = store
            .create(&admin_session(), trainer_account("coach@gym.test"))
            .await
            .unwrap();

        store.deactivate(&admin_session(), &created.id).await.unwrap();

        let stored = store.get(&created.id).await.unwrap().unwrap();
        assert!(!stored.active);
        assert!(store.list_trainers().await.unwrap().is_empty());
    }
}
