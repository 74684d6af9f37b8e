use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::Session;

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// The identity carried by the current session
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// User ID
    pub id: String,

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
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.clone(),
            name: session.name.clone(),
            email: session.email.clone(),
            role: session.role.as_str().to_string(),
            permissions: session
                .permissions
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            image: session.avatar.clone(),
        }
    }
}
