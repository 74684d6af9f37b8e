use poem_openapi::Object;

use crate::types::db::lead;

/// Request model for creating a lead
#[derive(Object, Debug)]
pub struct CreateLeadRequest {
    /// Prospect name (1-200 characters)
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    /// Contact phone number
    #[oai(validator(min_length = 1, max_length = 20))]
    pub phone: String,

    pub email: Option<String>,

    /// Lead source (WALK_IN, REFERRAL, PHONE, WEBSITE, SOCIAL_MEDIA, OTHER)
    pub source: String,

    pub interested_plan: Option<String>,
    pub notes: Option<String>,

    /// Follow-up time (Unix timestamp)
    pub follow_up_date: Option<i64>,
}

/// Request model for updating a lead's captured fields
#[derive(Object, Debug)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<i64>,
    pub interested_plan: Option<String>,
}

/// Request model for a direct status write
#[derive(Object, Debug)]
pub struct UpdateLeadStatusRequest {
    /// Target status (NEW, CONTACTED, FOLLOW_UP, CONVERTED, LOST)
    pub status: String,
}

/// Response model representing a lead
#[derive(Object, Debug)]
pub struct LeadDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub source: String,
    pub status: String,
    pub interested_plan: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<i64>,
    pub last_contact_date: Option<i64>,
    pub converted_date: Option<i64>,
    pub assigned_to: String,
    pub created_at: i64,
}

impl From<lead::Model> for LeadDto {
    fn from(model: lead::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            source: model.source,
            status: model.status,
            interested_plan: model.interested_plan,
            notes: model.notes,
            follow_up_date: model.follow_up_date,
            last_contact_date: model.last_contact_date,
            converted_date: model.converted_date,
            assigned_to: model.assigned_to,
            created_at: model.created_at,
        }
    }
}

/// Mutation result carrying the lead
#[derive(Object, Debug)]
pub struct LeadActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<LeadDto>,
}

impl LeadActionResponse {
    pub fn ok(lead: LeadDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(lead),
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

/// Leads grouped by pipeline state
#[derive(Object, Debug)]
pub struct LeadBoardResponse {
    pub new: Vec<LeadDto>,
    pub contacted: Vec<LeadDto>,
    pub follow_up: Vec<LeadDto>,
    pub converted: Vec<LeadDto>,
    pub lost: Vec<LeadDto>,
}

#[derive(Object, Debug)]
pub struct StatusCount {
    pub key: String,
    pub count: u64,
}

/// Pipeline statistics
#[derive(Object, Debug)]
pub struct LeadStatsResponse {
    pub total: u64,
    pub converted: u64,
    /// Conversion rate in percent
    pub conversion_rate: f64,
    pub status_counts: Vec<StatusCount>,
    pub source_counts: Vec<StatusCount>,
}

/// Captured fields handed forward after a confirmed conversion, used to
/// pre-populate the member creation form. The member itself is not
/// created by the conversion.
#[derive(Object, Debug)]
pub struct ConvertLeadResponse {
    pub success: bool,
    pub error: Option<String>,
    pub lead_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ConvertLeadResponse {
    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            lead_id: None,
            name: None,
            phone: None,
            email: None,
        }
    }
}
