use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Principal;
use shared_models::authz::{Action, Authorizer};
use shared_models::error::AppError;
use shared_models::records::Notification;
use shared_store::AppContext;

use crate::models::{CreateNotificationRequest, UnreadCountResponse};
use crate::services::dispatcher::NotificationDispatcher;

#[axum::debug_handler]
pub async fn list_notifications(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewNotifications)?;

    let dispatcher = NotificationDispatcher::new(ctx);
    let notifications = dispatcher.feed_for(&principal).await;

    Ok(Json(json!(notifications)))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    Authorizer::require(&principal, Action::ViewNotifications)?;

    let dispatcher = NotificationDispatcher::new(ctx);
    let unread_count = dispatcher.unread_count_for(&principal).await;

    Ok(Json(UnreadCountResponse { unread_count }))
}

#[axum::debug_handler]
pub async fn mark_as_read(
    State(ctx): State<Arc<AppContext>>,
    Path(notification_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewNotifications)?;

    let dispatcher = NotificationDispatcher::new(ctx);
    dispatcher
        .mark_read(&notification_id)
        .await
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(json!({ "message": "Notification marked as read" })))
}

#[axum::debug_handler]
pub async fn mark_all_as_read(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewNotifications)?;

    let dispatcher = NotificationDispatcher::new(ctx);
    dispatcher.mark_all_read_for(&principal).await;

    Ok(Json(json!({ "message": "All notifications marked as read" })))
}

#[axum::debug_handler]
pub async fn create_notification(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Authorizer::require(&principal, Action::PublishNotifications)?;

    if request.message.trim().is_empty() {
        return Err(AppError::ValidationError("Message is required".to_string()));
    }

    let notification = ctx
        .store
        .notifications
        .insert(Notification {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            recipient: request.recipient,
            message: request.message,
            kind: request.kind,
            read: false,
            created_at: Utc::now(),
        })
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notification created",
            "notification": notification
        })),
    ))
}
