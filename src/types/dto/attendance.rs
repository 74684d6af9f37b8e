use poem_openapi::Object;

use crate::types::db::attendance;

/// Request model for marking attendance
#[derive(Object, Debug)]
pub struct MarkAttendanceRequest {
    pub member_id: String,

    /// Check-in time (Unix timestamp); defaults to now
    pub check_in: Option<i64>,

    /// Check-out time; closes today's visit
    pub check_out: Option<i64>,
}

/// Request model for front-desk quick check-in
#[derive(Object, Debug)]
pub struct QuickCheckInRequest {
    #[oai(validator(min_length = 1, max_length = 20))]
    pub membership_number: String,
}

/// Response model representing an attendance entry
#[derive(Object, Debug)]
pub struct AttendanceDto {
    pub id: String,
    pub member_id: String,
    pub date: i64,
    pub check_in: i64,
    pub check_out: Option<i64>,
    pub duration_minutes: Option<i32>,
}

impl From<attendance::Model> for AttendanceDto {
    fn from(model: attendance::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            date: model.date,
            check_in: model.check_in,
            check_out: model.check_out,
            duration_minutes: model.duration_minutes,
        }
    }
}

/// Mutation result carrying the attendance entry
#[derive(Object, Debug)]
pub struct AttendanceActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<AttendanceDto>,
}

impl AttendanceActionResponse {
    pub fn ok(entry: AttendanceDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(entry),
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
