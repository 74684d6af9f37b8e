// Internal types - not exposed through the API surface
pub mod auth;
pub mod session;
pub mod status;

pub use session::Session;
pub use status::{
    DiscountType, LeadSource, LeadStatus, MemberStatus, NotificationKind, NotificationStatus,
    PaymentMode,
};
