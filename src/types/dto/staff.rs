use poem_openapi::Object;

use crate::types::db::user;

/// Request model for creating a staff account
#[derive(Object, Debug)]
pub struct CreateUserRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    #[oai(validator(min_length = 3, max_length = 320))]
    pub email: String,

    #[oai(validator(min_length = 8, max_length = 128))]
    pub password: String,

    /// Role name (SUPER_ADMIN, ADMIN, TRAINER, RECEPTIONIST, HELPER, CUSTOM)
    pub role: String,

    /// Explicit permission names; authoritative only for CUSTOM
    pub permissions: Option<Vec<String>>,

    pub phone: Option<String>,
}

/// Request model for updating a staff account
#[derive(Object, Debug)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub phone: Option<String>,

    /// When present the password is rotated
    pub password: Option<String>,
}

/// Request model for creating a trainer account
#[derive(Object, Debug)]
pub struct CreateTrainerRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    #[oai(validator(min_length = 3, max_length = 320))]
    pub email: String,

    #[oai(validator(min_length = 8, max_length = 128))]
    pub password: String,

    pub phone: Option<String>,
}

/// Staff account, password hash never included
#[derive(Object, Debug)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        let permissions = serde_json::from_str(&model.permissions).unwrap_or_default();
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            permissions,
            phone: model.phone,
            active: model.active,
            last_login: model.last_login,
            created_at: model.created_at,
        }
    }
}

/// Mutation result carrying the account
#[derive(Object, Debug)]
pub struct UserActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<UserDto>,
}

impl UserActionResponse {
    pub fn ok(user: UserDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(user),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            data: None,
        }
    }
}
