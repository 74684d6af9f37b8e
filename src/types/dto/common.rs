use poem_openapi::Object;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Result of a mutation that carries no payload. Business-rule failures
/// come back as `success: false` with a message, not as a transport
/// error.
#[derive(Object, Debug)]
pub struct ActionResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}
