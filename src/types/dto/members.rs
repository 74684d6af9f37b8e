use poem_openapi::Object;

use crate::types::db::member;

/// Request model for creating a member
#[derive(Object, Debug)]
pub struct CreateMemberRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    #[oai(validator(min_length = 1, max_length = 20))]
    pub phone: String,

    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,

    /// Date of birth (Unix timestamp)
    pub date_of_birth: Option<i64>,
    pub gender: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,

    /// Assigned trainer's user id
    pub trainer_id: Option<String>,
    pub notes: Option<String>,
}

/// Request model for updating a member
#[derive(Object, Debug)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub trainer_id: Option<String>,
    pub notes: Option<String>,
}

/// Response model representing a member
#[derive(Object, Debug)]
pub struct MemberDto {
    pub id: String,
    pub membership_number: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub date_of_birth: Option<i64>,
    pub gender: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub trainer_id: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl From<member::Model> for MemberDto {
    fn from(model: member::Model) -> Self {
        Self {
            id: model.id,
            membership_number: model.membership_number,
            name: model.name,
            phone: model.phone,
            email: model.email,
            address: model.address,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            emergency_name: model.emergency_name,
            emergency_contact: model.emergency_contact,
            blood_group: model.blood_group,
            medical_conditions: model.medical_conditions,
            trainer_id: model.trainer_id,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

/// Mutation result carrying the member
#[derive(Object, Debug)]
pub struct MemberActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<MemberDto>,
}

impl MemberActionResponse {
    pub fn ok(member: MemberDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(member),
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

/// One page of the member list
#[derive(Object, Debug)]
pub struct MemberListResponse {
    pub members: Vec<MemberDto>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}
