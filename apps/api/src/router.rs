use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use inventory_cell::router::medicine_routes;
use notification_cell::router::notification_routes;
use shared_store::AppContext;

pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/auth", auth_routes(ctx.clone()))
        .nest("/appointments", appointment_routes(ctx.clone()))
        .nest("/medicines", medicine_routes(ctx.clone()))
        .nest("/notifications", notification_routes(ctx))
}
