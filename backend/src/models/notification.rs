use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: String,
    /// Recipient account.
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Leave,
    Payroll,
    System,
}

impl Notification {
    pub fn new(user_id: String, title: String, message: String, kind: NotificationKind) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id,
            title,
            message,
            kind,
            read: false,
            read_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `false` when the notification was already read.
    pub fn mark_read(&mut self) -> bool {
        if self.read {
            return false;
        }
        let now = Utc::now();
        self.read = true;
        self.read_at = Some(now);
        self.updated_at = now;
        true
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationRequest {
    /// Recipient; omitted means every active user.
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    pub kind: Option<NotificationKind>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationCount {
    pub count: u64,
}
