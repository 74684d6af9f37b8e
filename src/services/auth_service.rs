use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::auth::{Permission, Role};
use crate::errors::AuthError;
use crate::services::{password, TokenService};
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::Session;

/// Verifies credentials and mints sessions.
///
/// Absent user, inactive account and wrong password are deliberately
/// indistinguishable to the caller.
pub struct AuthService {
    db: DatabaseConnection,
    password_pepper: String,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, password_pepper: String, tokens: Arc<TokenService>) -> Self {
        Self {
            db,
            password_pepper,
            tokens,
        }
    }

    /// Authenticate by email and password.
    ///
    /// On success the last-login timestamp is stamped best-effort (a
    /// failed stamp is logged, never surfaced) and a 30-day session
    /// token is issued carrying the user's identity, role and effective
    /// permission set.
    pub async fn login(&self, email: &str, plain_password: &str) -> Result<(String, Session), AuthError> {
        let found = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_credentials())?;

        let found = found.ok_or_else(AuthError::invalid_credentials)?;

        if !found.active {
            return Err(AuthError::invalid_credentials());
        }

        if !password::verify_password(&self.password_pepper, plain_password, &found.password_hash) {
            return Err(AuthError::invalid_credentials());
        }

        let mut stamp: user::ActiveModel = found.clone().into();
        stamp.last_login = Set(Some(Utc::now().timestamp()));
        if let Err(e) = stamp.update(&self.db).await {
            tracing::warn!(error = %e, user_id = %found.id, "failed to stamp last_login");
        }

        let session = Self::session_for(&found)?;
        let token = self.tokens.issue_session(&session)?;

        Ok((token, session))
    }

    /// Effective permissions: the explicit set for CUSTOM, the role
    /// defaults otherwise. Frozen into the token at issue time.
    fn session_for(record: &user::Model) -> Result<Session, AuthError> {
        let role = Role::parse(&record.role).ok_or_else(|| {
            AuthError::internal_error(format!("Unknown role on user record: {}", record.role))
        })?;

        let permissions = match role {
            Role::Custom => Permission::parse_set(&record.permissions),
            _ => role.default_permissions().to_vec(),
        };

        Ok(Session {
            user_id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            role,
            permissions,
            avatar: record.avatar.clone(),
        })
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use uuid::Uuid;

    const TEST_PEPPER: &str = "test-pepper-for-auth-service";
    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup() -> (DatabaseConnection, AuthService) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string()));
        let service = AuthService::new(db.clone(), TEST_PEPPER.to_string(), tokens);

        (db, service)
    }

    async fn insert_user(db: &DatabaseConnection, email: &str, pass: &str, role: &str, active: bool) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let record = user::ActiveModel {
            id: Set(id.clone()),
            name: Set("Test User".to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password::hash_password(TEST_PEPPER, pass).unwrap()),
            role: Set(role.to_string()),
            permissions: Set("[]".to_string()),
            phone: Set(None),
            avatar: Set(None),
            active: Set(active),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        record.insert(db).await.expect("Failed to insert user");
        id
    }

    #[tokio::test]
    async fn login_succeeds_with_valid_credentials() {
        let (db, service) = setup().await;
        insert_user(&db, "admin@gym.test", "admin-pass", "ADMIN", true).await;

        let (token, session) = service.login("admin@gym.test", "admin-pass").await.unwrap();

        assert!(!token.is_empty());
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.email, "admin@gym.test");
        // Admin sessions carry the full default permission set.
        assert_eq!(session.permissions, Permission::ALL.to_vec());
    }

    #[tokio::test]
    async fn login_fails_for_inactive_user_even_with_correct_password() {
        let (db, service) = setup().await;
        insert_user(&db, "gone@gym.test", "correct-pass", "RECEPTIONIST", false).await;

        let result = service.login("gone@gym.test", "correct-pass").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn login_fails_with_wrong_password() {
        let (db, service) = setup().await;
        insert_user(&db, "desk@gym.test", "right", "RECEPTIONIST", true).await;

        let result = service.login("desk@gym.test", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn login_fails_for_unknown_email() {
        let (_db, service) = setup().await;
        let result = service.login("nobody@gym.test", "whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let (db, service) = setup().await;
        let id = insert_user(&db, "desk@gym.test", "pass", "RECEPTIONIST", true).await;

        service.login("desk@gym.test", "pass").await.unwrap();

        let record = User::find_by_id(&id).one(&db).await.unwrap().unwrap();
        assert!(record.last_login.is_some());
    }

    #[tokio::test]
    async fn custom_role_session_carries_explicit_permission_set() {
        let (db, service) = setup().await;
        let id = insert_user(&db, "custom@gym.test", "pass", "CUSTOM", true).await;

        // Give the user an explicit set.
        let record = User::find_by_id(&id).one(&db).await.unwrap().unwrap();
        let mut record: user::ActiveModel = record.into();
        record.permissions = Set(r#"["VIEW_BILLING","VIEW_REPORTS"]"#.to_string());
        record.update(&db).await.unwrap();

        let (_token, session) = service.login("custom@gym.test", "pass").await.unwrap();
        assert_eq!(
            session.permissions,
            vec![Permission::ViewBilling, Permission::ViewReports]
        );
    }

    #[tokio::test]
    async fn trainer_session_carries_trainer_defaults() {
        let (db, service) = setup().await;
        insert_user(&db, "coach@gym.test", "pass", "TRAINER", true).await;

        let (_token, session) = service.login("coach@gym.test", "pass").await.unwrap();
        assert_eq!(session.permissions, Role::Trainer.default_permissions().to_vec());
    }
}
