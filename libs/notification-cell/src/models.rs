use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::records::{NotificationKind, RecipientType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: Option<Uuid>,
    pub recipient: RecipientType,
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Appointment
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread_count: usize,
}
