use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{Principal, Role};
use shared_models::records::{Notification, NotificationKind, RecipientType};
use shared_store::AppContext;

/// Fire-and-forget side channel for state-transition notices. Callers never
/// wait on or react to delivery; a dispatch that cannot land is a log line,
/// not an error.
pub struct NotificationDispatcher {
    ctx: Arc<AppContext>,
}

impl NotificationDispatcher {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Posts to the shared admin feed.
    pub async fn notify_admins(&self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        debug!("Dispatching admin notification: {}", message);
        self.ctx
            .store
            .notifications
            .insert(Notification {
                id: Uuid::new_v4(),
                user_id: None,
                recipient: RecipientType::Admin,
                message,
                kind,
                read: false,
                created_at: Utc::now(),
            })
            .await;
    }

    /// Posts to one user's feed.
    pub async fn notify_user(&self, user_id: Uuid, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        debug!("Dispatching notification to user {}: {}", user_id, message);
        self.ctx
            .store
            .notifications
            .insert(Notification {
                id: Uuid::new_v4(),
                user_id: Some(user_id),
                recipient: RecipientType::User,
                message,
                kind,
                read: false,
                created_at: Utc::now(),
            })
            .await;
    }

    /// Feed visible to the given principal: admins read the admin feed,
    /// everyone else reads their own.
    pub async fn feed_for(&self, principal: &Principal) -> Vec<Notification> {
        let mut notifications = if principal.role == Role::Admin {
            self.ctx
                .store
                .notifications
                .filter(|n| n.recipient == RecipientType::Admin)
                .await
        } else {
            self.ctx
                .store
                .notifications
                .filter(|n| n.user_id == Some(principal.user_id))
                .await
        };
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub async fn unread_count_for(&self, principal: &Principal) -> usize {
        if principal.role == Role::Admin {
            self.ctx
                .store
                .notifications
                .count(|n| !n.read && n.recipient == RecipientType::Admin)
                .await
        } else {
            self.ctx
                .store
                .notifications
                .count(|n| !n.read && n.user_id == Some(principal.user_id))
                .await
        }
    }

    pub async fn mark_read(&self, id: &Uuid) -> Option<Notification> {
        self.ctx
            .store
            .notifications
            .update(id, |n| n.read = true)
            .await
    }

    pub async fn mark_all_read_for(&self, principal: &Principal) -> usize {
        let is_admin = principal.role == Role::Admin;
        let user_id = principal.user_id;
        self.ctx
            .store
            .notifications
            .update_where(
                |n| {
                    !n.read
                        && if is_admin {
                            n.recipient == RecipientType::Admin
                        } else {
                            n.user_id == Some(user_id)
                        }
                },
                |n| n.read = true,
            )
            .await
    }
}
