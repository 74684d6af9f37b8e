// Database entities - SeaORM models
pub mod activity_log;
pub mod attendance;
pub mod diet_plan;
pub mod diet_type;
pub mod exercise;
pub mod fitness_goal;
pub mod lead;
pub mod member;
pub mod membership;
pub mod membership_plan;
pub mod notification;
pub mod payment;
pub mod user;
pub mod workout_plan;
