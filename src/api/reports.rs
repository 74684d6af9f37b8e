use std::sync::Arc;

use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::ReportStore;
use crate::types::dto::reports::{ModeDistributionDto, MonthlyRevenueDto, PlanRevenueDto};

/// Reporting API endpoints: dashboard aggregates only. File export is
/// out of scope here.
pub struct ReportsApi {
    reports: Arc<ReportStore>,
    tokens: Arc<TokenService>,
}

impl ReportsApi {
    pub fn new(reports: Arc<ReportStore>, tokens: Arc<TokenService>) -> Self {
        Self { reports, tokens }
    }
}

/// API tags for reporting endpoints
#[derive(Tags)]
enum ReportTags {
    /// Dashboard aggregates
    Reports,
}

#[OpenApi(prefix_path = "/reports")]
impl ReportsApi {
    /// Monthly revenue for the trailing months (default 6)
    #[oai(path = "/revenue", method = "get", tag = "ReportTags::Reports")]
    async fn revenue(
        &self,
        auth: SessionAuth,
        months: Query<Option<u32>>,
    ) -> Result<Json<Vec<MonthlyRevenueDto>>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewReports)?;

        let rows = self
            .reports
            .monthly_revenue(months.0.unwrap_or(6).clamp(1, 24))
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to compute revenue report")))?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }

    /// Revenue distribution across payment modes
    #[oai(path = "/payment-modes", method = "get", tag = "ReportTags::Reports")]
    async fn payment_modes(
        &self,
        auth: SessionAuth,
    ) -> Result<Json<Vec<ModeDistributionDto>>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewReports)?;

        let rows = self
            .reports
            .payment_mode_distribution()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to compute distribution")))?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }

    /// Active-membership revenue grouped by plan
    #[oai(path = "/plan-revenue", method = "get", tag = "ReportTags::Reports")]
    async fn plan_revenue(&self, auth: SessionAuth) -> Result<Json<Vec<PlanRevenueDto>>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewReports)?;

        let rows = self
            .reports
            .revenue_by_plan()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to compute plan revenue")))?;
        Ok(Json(rows.into_iter().map(Into::into).collect()))
    }
}
