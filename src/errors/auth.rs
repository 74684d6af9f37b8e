use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response for authentication and authorization
/// failures
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication and authorization error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// No valid session
    #[oai(status = 401)]
    Unauthorized(Json<AuthErrorResponse>),

    /// Valid session, insufficient role or permission
    #[oai(status = 403)]
    Forbidden(Json<AuthErrorResponse>),

    /// Invalid or malformed session token
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// Session token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    ///
    /// Intentionally generic: absent user, inactive account and wrong
    /// password all surface the same message.
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized(Json(AuthErrorResponse {
            error: "unauthorized".to_string(),
            message: "Unauthorized".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        AuthError::Forbidden(Json(AuthErrorResponse {
            error: "forbidden".to_string(),
            message: "Unauthorized".to_string(),
            status_code: 403,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(AuthErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed session token".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(AuthErrorResponse {
            error: "expired_token".to_string(),
            message: "Session has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        AuthError::InternalError(Json(AuthErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::Unauthorized(json) => json.0.message.clone(),
            AuthError::Forbidden(json) => json.0.message.clone(),
            AuthError::InvalidToken(json) => json.0.message.clone(),
            AuthError::ExpiredToken(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
