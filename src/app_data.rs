use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::BootstrapSettings;
use crate::services::{AuthService, LeadConversionService, TokenService};
use crate::stores::{
    ActivityLogStore, AttendanceStore, CatalogStore, LeadStore, MemberStore, MembershipStore,
    NotificationStore, PaymentStore, PlanStore, ReportStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern.
///
/// All dependencies are created once in main.rs and shared across API
/// objects. The activity log store is created first since the other
/// stores depend on it for logging.
pub struct AppData {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub lead_conversion: Arc<LeadConversionService>,
    pub activity: Arc<ActivityLogStore>,
    pub users: Arc<UserStore>,
    pub leads: Arc<LeadStore>,
    pub members: Arc<MemberStore>,
    pub memberships: Arc<MembershipStore>,
    pub payments: Arc<PaymentStore>,
    pub attendance: Arc<AttendanceStore>,
    pub catalog: Arc<CatalogStore>,
    pub plans: Arc<PlanStore>,
    pub notifications: Arc<NotificationStore>,
    pub reports: Arc<ReportStore>,
}

impl AppData {
    /// Wire every store and service. The database should be connected
    /// and migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: &BootstrapSettings) -> Self {
        tracing::info!("initializing application data");

        let tokens = Arc::new(TokenService::new(settings.session_secret().to_string()));
        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            settings.password_pepper().to_string(),
            tokens.clone(),
        ));

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let users = Arc::new(UserStore::new(
            db.clone(),
            settings.password_pepper().to_string(),
            activity.clone(),
        ));
        let leads = Arc::new(LeadStore::new(db.clone(), activity.clone()));
        let lead_conversion = Arc::new(LeadConversionService::new(leads.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity.clone()));
        let memberships = Arc::new(MembershipStore::new(
            db.clone(),
            members.clone(),
            activity.clone(),
        ));
        let payments = Arc::new(PaymentStore::new(
            db.clone(),
            members.clone(),
            memberships.clone(),
            activity.clone(),
        ));
        let attendance = Arc::new(AttendanceStore::new(
            db.clone(),
            members.clone(),
            activity.clone(),
        ));
        let catalog = Arc::new(CatalogStore::new(db.clone(), activity.clone()));
        let plans = Arc::new(PlanStore::new(db.clone(), activity.clone()));
        let notifications = Arc::new(NotificationStore::new(db.clone()));
        let reports = Arc::new(ReportStore::new(db.clone()));

        tracing::info!("application data initialized");

        Self {
            db,
            tokens,
            auth_service,
            lead_conversion,
            activity,
            users,
            leads,
            members,
            memberships,
            payments,
            attendance,
            catalog,
            plans,
            notifications,
            reports,
        }
    }
}
