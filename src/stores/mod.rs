// Stores layer - data access and repository pattern
pub mod activity_log_store;
pub mod attendance_store;
pub mod catalog_store;
pub mod lead_store;
pub mod member_store;
pub mod membership_store;
pub mod notification_store;
pub mod payment_store;
pub mod plan_store;
pub mod report_store;
pub mod user_store;

pub use activity_log_store::ActivityLogStore;
pub use attendance_store::AttendanceStore;
pub use catalog_store::CatalogStore;
pub use lead_store::{LeadBoard, LeadStats, LeadStore, LeadUpdate, NewLead};
pub use member_store::{MemberPage, MemberQuery, MemberStore, MemberUpdate, NewMember};
pub use membership_store::{AssignMembership, MembershipStore, NewPlan, PlanUpdate};
pub use notification_store::{NotificationCounts, NotificationFeed, NotificationStore};
pub use payment_store::{NewPayment, PaymentPage, PaymentQuery, PaymentStats, PaymentStore};
pub use plan_store::{
    DietPlanUpdate, ExerciseSet, Meal, NewDietPlan, NewWorkoutPlan, PlanStore, WorkoutPlanUpdate,
};
pub use report_store::{ModeDistribution, MonthlyRevenue, PlanRevenue, ReportStore};
pub use user_store::{NewUser, UserStore, UserUpdate};
