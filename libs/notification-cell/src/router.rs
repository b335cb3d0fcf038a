use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_store::AppContext;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn notification_routes(ctx: Arc<AppContext>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/", post(handlers::create_notification))
        .route("/unread-count", get(handlers::unread_count))
        .route("/read-all", patch(handlers::mark_all_as_read))
        .route("/{notification_id}/read", patch(handlers::mark_as_read))
        .layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(ctx)
}
