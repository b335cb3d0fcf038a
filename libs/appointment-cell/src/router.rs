use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_store::AppContext;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(ctx: Arc<AppContext>) -> Router {
    // All appointment operations require authentication
    let protected_routes = Router::new()
        .route("/book", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/my", get(handlers::my_appointments))
        .route("/patient/{patient_id}", get(handlers::patient_appointments))
        .route("/reports", get(handlers::appointment_reports))
        .route("/consultations", get(handlers::list_consultations))
        .route("/consultation/{appointment_id}", get(handlers::get_consultation))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .route("/{appointment_id}/approve", patch(handlers::approve_appointment))
        .route("/{appointment_id}/reject", patch(handlers::reject_appointment))
        .route(
            "/{appointment_id}/start-consultation",
            post(handlers::start_consultation),
        )
        .route(
            "/{appointment_id}/consultation",
            patch(handlers::complete_consultation),
        )
        .layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(ctx)
}
