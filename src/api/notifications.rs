use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::NotificationStore;
use crate::types::dto::common::ActionResponse;
use crate::types::dto::notifications::{NotificationCheckResponse, NotificationFeedResponse};

/// In-app notifications API endpoints
pub struct NotificationsApi {
    notifications: Arc<NotificationStore>,
    tokens: Arc<TokenService>,
}

impl NotificationsApi {
    pub fn new(notifications: Arc<NotificationStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            notifications,
            tokens,
        }
    }

    /// Shared body of the GET/POST check endpoint. Polled periodically
    /// by clients; the route guard has already vetted the caller.
    async fn run_check(&self) -> NotificationCheckResponse {
        match self.notifications.check_all().await {
            Ok(counts) => NotificationCheckResponse::ok(counts),
            Err(e) => {
                NotificationCheckResponse::failed(e.caller_message("Failed to check notifications"))
            }
        }
    }
}

/// API tags for notification endpoints
#[derive(Tags)]
enum NotificationTags {
    /// Notification polling and feed
    Notifications,
}

#[OpenApi(prefix_path = "/api/notifications")]
impl NotificationsApi {
    /// Run the notification window scans (polling)
    #[oai(path = "/check", method = "get", tag = "NotificationTags::Notifications")]
    async fn check(&self) -> Json<NotificationCheckResponse> {
        Json(self.run_check().await)
    }

    /// Run the notification window scans (manual trigger)
    #[oai(path = "/check", method = "post", tag = "NotificationTags::Notifications")]
    async fn check_post(&self) -> Json<NotificationCheckResponse> {
        Json(self.run_check().await)
    }

    /// Grouped non-dismissed notifications
    #[oai(path = "/", method = "get", tag = "NotificationTags::Notifications")]
    async fn feed(&self, auth: SessionAuth) -> Result<Json<NotificationFeedResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let feed = self
            .notifications
            .feed()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to fetch notifications")))?;
        Ok(Json(feed.into()))
    }

    /// Mark one notification read
    #[oai(path = "/:id/read", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_read(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.notifications.mark_read(&id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to mark notification as read")),
        }))
    }

    /// Dismiss one notification
    #[oai(path = "/:id/dismiss", method = "post", tag = "NotificationTags::Notifications")]
    async fn dismiss(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.notifications.dismiss(&id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to dismiss notification")),
        }))
    }

    /// Mark every unread notification read
    #[oai(path = "/read-all", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_all_read(&self, auth: SessionAuth) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.notifications.mark_all_read().await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => {
                ActionResponse::failed(e.caller_message("Failed to mark all notifications as read"))
            }
        }))
    }
}
