// Services layer - business logic and orchestration
pub mod auth_service;
pub mod lead_conversion;
pub mod password;
pub mod token_service;

pub use auth_service::AuthService;
pub use lead_conversion::{CapturedLead, LeadConversionService};
pub use token_service::TokenService;
