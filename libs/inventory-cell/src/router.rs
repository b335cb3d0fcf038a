use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_store::AppContext;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn medicine_routes(ctx: Arc<AppContext>) -> Router {
    // All inventory operations require authentication
    let protected_routes = Router::new()
        .route("/", get(handlers::list_medicines))
        .route("/", post(handlers::intake_medicine))
        .route("/deduct", post(handlers::deduct_medicines))
        .route("/{medicine_id}/dispense", post(handlers::dispense_medicine))
        .route("/{medicine_id}", delete(handlers::delete_medicine))
        .layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(ctx)
}
