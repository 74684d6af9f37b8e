use poem_openapi::Object;

use crate::types::db::{membership, membership_plan};

/// Request model for creating a membership plan
#[derive(Object, Debug)]
pub struct CreatePlanRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    pub description: Option<String>,

    /// Plan length in days
    #[oai(validator(minimum(value = "1")))]
    pub duration_days: i32,

    /// Whole-currency price
    #[oai(validator(minimum(value = "0")))]
    pub price: i64,

    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    pub popular: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Request model for updating a membership plan
#[derive(Object, Debug)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<i32>,
    pub price: Option<i64>,
    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    pub popular: Option<bool>,
    pub active: Option<bool>,
}

/// Request model for assigning a plan to a member
#[derive(Object, Debug)]
pub struct AssignMembershipRequest {
    pub member_id: String,
    pub plan_id: String,

    /// Start (Unix timestamp)
    pub start_date: i64,

    /// Discount value; meaning depends on discount_type
    pub discount: Option<i64>,

    /// PERCENTAGE or FIXED
    pub discount_type: Option<String>,

    pub notes: Option<String>,
}

/// Response model representing a membership plan
#[derive(Object, Debug)]
pub struct PlanDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price: i64,
    pub features: Vec<String>,
    pub color: Option<String>,
    pub popular: bool,
    pub active: bool,
    pub sort_order: i32,
}

impl From<membership_plan::Model> for PlanDto {
    fn from(model: membership_plan::Model) -> Self {
        let features = serde_json::from_str(&model.features).unwrap_or_default();
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            duration_days: model.duration_days,
            price: model.price,
            features,
            color: model.color,
            popular: model.popular,
            active: model.active,
            sort_order: model.sort_order,
        }
    }
}

/// Response model representing an assigned membership
#[derive(Object, Debug)]
pub struct MembershipDto {
    pub id: String,
    pub member_id: String,
    pub plan_id: String,
    pub start_date: i64,
    pub end_date: i64,
    pub amount: i64,
    pub discount: Option<i64>,
    pub discount_type: Option<String>,
    pub final_amount: i64,
    pub active: bool,
    pub notes: Option<String>,
}

impl From<membership::Model> for MembershipDto {
    fn from(model: membership::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            plan_id: model.plan_id,
            start_date: model.start_date,
            end_date: model.end_date,
            amount: model.amount,
            discount: model.discount,
            discount_type: model.discount_type,
            final_amount: model.final_amount,
            active: model.active,
            notes: model.notes,
        }
    }
}

/// Mutation result carrying the plan
#[derive(Object, Debug)]
pub struct PlanActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<PlanDto>,
}

impl PlanActionResponse {
    pub fn ok(plan: PlanDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(plan),
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

/// Mutation result carrying the membership
#[derive(Object, Debug)]
pub struct MembershipActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<MembershipDto>,
}

impl MembershipActionResponse {
    pub fn ok(membership: MembershipDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(membership),
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
