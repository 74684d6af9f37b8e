use poem_openapi::Object;

use crate::stores::{NotificationCounts, NotificationFeed};
use crate::types::db::notification;

/// Counts returned by the polling check endpoint
#[derive(Object, Debug)]
pub struct NotificationCountsDto {
    pub leads: u64,
    pub payments: u64,
    pub members: u64,
}

/// Response of the periodic check endpoint
#[derive(Object, Debug)]
pub struct NotificationCheckResponse {
    pub success: bool,
    pub error: Option<String>,
    pub counts: Option<NotificationCountsDto>,
}

impl NotificationCheckResponse {
    pub fn ok(counts: NotificationCounts) -> Self {
        Self {
            success: true,
            error: None,
            counts: Some(NotificationCountsDto {
                leads: counts.leads,
                payments: counts.payments,
                members: counts.members,
            }),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            counts: None,
        }
    }
}

/// Response model representing a notification
#[derive(Object, Debug)]
pub struct NotificationDto {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub status: String,
    pub metadata: Option<String>,
    pub created_at: i64,
}

impl From<notification::Model> for NotificationDto {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            message: model.message,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            status: model.status,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}

/// Grouped non-dismissed notifications
#[derive(Object, Debug)]
pub struct NotificationFeedResponse {
    pub leads: Vec<NotificationDto>,
    pub payments: Vec<NotificationDto>,
    pub members: Vec<NotificationDto>,
    pub total: u64,
    pub unread: u64,
}

impl From<NotificationFeed> for NotificationFeedResponse {
    fn from(feed: NotificationFeed) -> Self {
        Self {
            leads: feed.leads.into_iter().map(Into::into).collect(),
            payments: feed.payments.into_iter().map(Into::into).collect(),
            members: feed.members.into_iter().map(Into::into).collect(),
            total: feed.total,
            unread: feed.unread,
        }
    }
}
