use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::AuthError;
use crate::types::internal::auth::Claims;
use crate::types::internal::Session;

/// Manages session token generation and validation.
///
/// Sessions are stateless 30-day HS256 JWTs. There is no server-side
/// revocation; a token stays valid until it expires or the signing secret
/// changes.
pub struct TokenService {
    session_secret: String,
    session_lifetime_days: i64,
}

impl TokenService {
    pub fn new(session_secret: String) -> Self {
        Self {
            session_secret,
            session_lifetime_days: 30,
        }
    }

    /// Issue a session token embedding the user's identity, role and
    /// effective permission set.
    pub fn issue_session(&self, session: &Session) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.session_lifetime_days * 24 * 60 * 60;

        let claims = Claims {
            sub: session.user_id.clone(),
            name: session.name.clone(),
            email: session.email.clone(),
            role: session.role.as_str().to_string(),
            permissions: session
                .permissions
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            image: session.avatar.clone(),
            iat: now,
            exp: expiration,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.session_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to issue session token: {}", e)))
    }

    /// Validate a session token and return its claims.
    pub fn validate_session(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.session_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::expired_token()
            } else {
                AuthError::invalid_token()
            }
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("session_secret", &"<redacted>")
            .field("session_lifetime_days", &self.session_lifetime_days)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ session_lifetime: {}days }}",
            self.session_lifetime_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Permission, Role};

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn test_session() -> Session {
        Session {
            user_id: "user-123".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@example.com".to_string(),
            role: Role::Receptionist,
            permissions: vec![Permission::ViewMembers, Permission::CreateLeads],
            avatar: None,
        }
    }

    #[test]
    fn issued_token_validates_and_round_trips_identity() {
        let tokens = TokenService::new(TEST_SECRET.to_string());

        let token = tokens.issue_session(&test_session()).unwrap();
        let claims = tokens.validate_session(&token).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.role, "RECEPTIONIST");
        assert_eq!(claims.email, "desk@example.com");
        assert_eq!(
            claims.permissions,
            vec!["VIEW_MEMBERS".to_string(), "CREATE_LEADS".to_string()]
        );
    }

    #[test]
    fn session_lifetime_is_thirty_days() {
        let tokens = TokenService::new(TEST_SECRET.to_string());

        let token = tokens.issue_session(&test_session()).unwrap();
        let claims = tokens.validate_session(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let tokens = TokenService::new(TEST_SECRET.to_string());
        let other = TokenService::new("another-secret-key-minimum-32-chars!!".to_string());

        let token = other.issue_session(&test_session()).unwrap();
        let result = tokens.validate_session(&token);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let tokens = TokenService::new(TEST_SECRET.to_string());

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-123".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@example.com".to_string(),
            role: "RECEPTIONIST".to_string(),
            permissions: Vec::new(),
            image: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let result = tokens.validate_session(&expired);
        assert!(matches!(result, Err(AuthError::ExpiredToken(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let tokens = TokenService::new(TEST_SECRET.to_string());
        assert!(matches!(
            tokens.validate_session("not-a-jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn debug_output_does_not_expose_the_secret() {
        let tokens = TokenService::new("super-secret-session-signing-key".to_string());
        let output = format!("{:?}", tokens);
        assert!(output.contains("<redacted>"));
        assert!(!output.contains("super-secret-session-signing-key"));
    }
}
