use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::AttendanceStore;
use crate::types::dto::attendance::{
    AttendanceActionResponse, AttendanceDto, MarkAttendanceRequest, QuickCheckInRequest,
};

/// Attendance API endpoints
pub struct AttendanceApi {
    attendance: Arc<AttendanceStore>,
    tokens: Arc<TokenService>,
}

impl AttendanceApi {
    pub fn new(attendance: Arc<AttendanceStore>, tokens: Arc<TokenService>) -> Self {
        Self { attendance, tokens }
    }
}

/// API tags for attendance endpoints
#[derive(Tags)]
enum AttendanceTags {
    /// Check-ins and check-outs
    Attendance,
}

#[OpenApi(prefix_path = "/attendance")]
impl AttendanceApi {
    /// Mark a check-in, or close today's visit with a check-out
    #[oai(path = "/", method = "post", tag = "AttendanceTags::Attendance")]
    async fn mark(
        &self,
        auth: SessionAuth,
        body: Json<MarkAttendanceRequest>,
    ) -> Result<Json<AttendanceActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::MarkAttendance)?;

        let result = self
            .attendance
            .mark(&session, &body.member_id, body.check_in, body.check_out)
            .await;

        Ok(Json(match result {
            Ok(entry) => AttendanceActionResponse::ok(AttendanceDto::from(entry)),
            Err(e) => AttendanceActionResponse::failed(e.caller_message("Failed to mark attendance")),
        }))
    }

    /// Front-desk quick check-in by membership number
    #[oai(path = "/quick-check-in", method = "post", tag = "AttendanceTags::Attendance")]
    async fn quick_check_in(
        &self,
        auth: SessionAuth,
        body: Json<QuickCheckInRequest>,
    ) -> Result<Json<AttendanceActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::MarkAttendance)?;

        let result = self
            .attendance
            .quick_check_in(&session, &body.membership_number)
            .await;

        Ok(Json(match result {
            Ok(entry) => AttendanceActionResponse::ok(AttendanceDto::from(entry)),
            Err(e) => AttendanceActionResponse::failed(e.caller_message("Failed to mark attendance")),
        }))
    }

    /// Attendance entries for a day (defaults to today)
    #[oai(path = "/", method = "get", tag = "AttendanceTags::Attendance")]
    async fn list(
        &self,
        auth: SessionAuth,
        day: Query<Option<i64>>,
    ) -> Result<Json<Vec<AttendanceDto>>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::MarkAttendance)?;

        let entries = self
            .attendance
            .list_for_day(day.0.unwrap_or_else(|| Utc::now().timestamp()))
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list attendance")))?;

        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }
}
