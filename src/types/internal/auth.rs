use serde::{Deserialize, Serialize};

/// JWT claims for the session cookie.
///
/// The token is the sole source of authorization data for its lifetime:
/// role or permission edits made after issuance only take effect once the
/// user logs in again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Role name
    pub role: String,

    /// Permission names effective for this session
    pub permissions: Vec<String>,

    /// Avatar reference, if any
    pub image: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
