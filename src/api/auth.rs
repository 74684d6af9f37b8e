use std::sync::Arc;

use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::SESSION_COOKIE;
use crate::errors::AuthError;
use crate::services::{AuthService, TokenService};
use crate::types::dto::auth::{LoginRequest, SessionResponse};

const SESSION_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    tokens: Arc<TokenService>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>, tokens: Arc<TokenService>) -> Self {
        Self {
            auth_service,
            tokens,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Login response: the session identity plus the session cookie.
#[derive(ApiResponse)]
pub enum LoginResponse {
    /// Authentication successful, session cookie set
    #[oai(status = 200)]
    Ok(
        Json<SessionResponse>,
        #[oai(header = "Set-Cookie")] String,
    ),
}

#[OpenApi]
impl AuthApi {
    /// Login with email and password to receive a session cookie
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<LoginResponse, AuthError> {
        let (token, session) = self.auth_service.login(&body.email, &body.password).await?;

        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, SESSION_MAX_AGE_SECONDS
        );

        Ok(LoginResponse::Ok(Json(SessionResponse::from(&session)), cookie))
    }

    /// Return the identity carried by the current session cookie
    #[oai(path = "/session", method = "get", tag = "AuthTags::Authentication")]
    async fn session(&self, auth: SessionAuth) -> Result<Json<SessionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        Ok(Json(SessionResponse::from(&session)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::password;
    use crate::types::db::user;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, Set};
    use uuid::Uuid;

    const TEST_PEPPER: &str = "test-pepper-for-api-tests";
    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup() -> AuthApi {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let now = Utc::now().timestamp();
        let record = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set("Admin User".to_string()),
            email: Set("admin@gym.test".to_string()),
            password_hash: Set(password::hash_password(TEST_PEPPER, "admin123").unwrap()),
            role: Set("ADMIN".to_string()),
            permissions: Set("[]".to_string()),
            phone: Set(None),
            avatar: Set(None),
            active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        record.insert(&db).await.expect("Failed to insert user");

        let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string()));
        let auth_service = Arc::new(AuthService::new(db, TEST_PEPPER.to_string(), tokens.clone()));
        AuthApi::new(auth_service, tokens)
    }

    #[tokio::test]
    async fn login_sets_a_session_cookie() {
        let api = setup().await;

        let result = api
            .login(Json(LoginRequest {
                email: "admin@gym.test".to_string(),
                password: "admin123".to_string(),
            }))
            .await;

        let LoginResponse::Ok(body, cookie) = result.unwrap();
        assert_eq!(body.0.email, "admin@gym.test");
        assert_eq!(body.0.role, "ADMIN");
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[tokio::test]
    async fn login_with_bad_password_is_generic_401() {
        let api = setup().await;

        let result = api
            .login(Json(LoginRequest {
                email: "admin@gym.test".to_string(),
                password: "wrong".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn session_endpoint_round_trips_the_cookie_token() {
        let api = setup().await;
        let LoginResponse::Ok(_, cookie) = api
            .login(Json(LoginRequest {
                email: "admin@gym.test".to_string(),
                password: "admin123".to_string(),
            }))
            .await
            .unwrap();

        let token = cookie
            .strip_prefix("session=")
            .and_then(|rest| rest.split(';').next())
            .unwrap()
            .to_string();

        let auth = SessionAuth(poem_openapi::auth::ApiKey { key: token });
        let session = api.session(auth).await.unwrap();
        assert_eq!(session.0.role, "ADMIN");
        assert!(!session.0.permissions.is_empty());
    }

    #[tokio::test]
    async fn session_endpoint_rejects_garbage_tokens() {
        let api = setup().await;
        let auth = SessionAuth(poem_openapi::auth::ApiKey {
            key: "garbage".to_string(),
        });
        assert!(matches!(api.session(auth).await, Err(AuthError::InvalidToken(_))));
    }
}
