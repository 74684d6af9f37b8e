// API layer - HTTP endpoints
pub mod attendance;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod health;
pub mod leads;
pub mod members;
pub mod memberships;
pub mod notifications;
pub mod plans;
pub mod reports;
pub mod staff;

pub use attendance::AttendanceApi;
pub use auth::AuthApi;
pub use billing::BillingApi;
pub use catalog::CatalogApi;
pub use health::HealthApi;
pub use leads::LeadsApi;
pub use members::MembersApi;
pub use memberships::MembershipsApi;
pub use notifications::NotificationsApi;
pub use plans::{DietsApi, WorkoutsApi};
pub use reports::ReportsApi;
pub use staff::{StaffApi, TrainersApi};

use poem_openapi::auth::ApiKey;
use poem_openapi::SecurityScheme;

use crate::errors::AuthError;
use crate::services::TokenService;
use crate::types::internal::Session;

/// Session cookie authentication. The cookie value is the signed JWT
/// issued at login.
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "session", key_in = "cookie")]
pub struct SessionAuth(pub ApiKey);

/// Resolve the session for a handler. Handlers re-check what they need
/// on top of the route guard; an unusable token is a 401 here rather
/// than a redirect.
pub fn current_session(tokens: &TokenService, auth: &SessionAuth) -> Result<Session, AuthError> {
    let claims = tokens.validate_session(&auth.0.key)?;
    Session::from_claims(claims).ok_or_else(AuthError::invalid_token)
}
