use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::HealthResponse;

/// Health check API, mounted under the public prefix so the guard lets
/// it through unconditionally.
pub struct HealthApi;

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi(prefix_path = "/api/public")]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Returns the current status of the API service
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
