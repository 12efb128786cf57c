//! Dashboard notifications. Server-created; the user can mark them read or delete them.

use serde::{Deserialize, Serialize};

use super::{RecordId, Resource, Updatable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, alias = "is_read")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPatch {
    pub read: bool,
}

impl NotificationPatch {
    pub fn mark_read() -> Self {
        Self { read: true }
    }
}

impl Resource for Notification {
    const PATH: &'static str = "/api/notifications";
    const NAME: &'static str = "notification";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Updatable for Notification {
    type Patch = NotificationPatch;
}

/// Number of notifications not yet read
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}
