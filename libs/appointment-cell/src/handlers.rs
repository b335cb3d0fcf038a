use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use inventory_cell::models::InventoryError;
use shared_models::auth::Principal;
use shared_models::authz::{Action, Authorizer};
use shared_models::error::AppError;
use shared_store::AppContext;

use crate::models::{AppointmentError, BookAppointmentRequest, CompleteConsultationRequest};
use crate::services::booking::AppointmentService;
use crate::services::reporting::ReportingService;

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::InvalidTransition { .. } => AppError::InvalidTransition(e.to_string()),
        AppointmentError::Validation(msg) => AppError::ValidationError(msg),
        AppointmentError::Stock(stock) => match stock {
            InventoryError::InsufficientStock { .. } => {
                AppError::InsufficientStock(stock.to_string())
            }
            InventoryError::Validation(msg) => AppError::ValidationError(msg),
            // Unknown batches are skipped, not raised; reaching here means
            // the processor contract changed underneath us.
            InventoryError::NotFound => AppError::Internal(stock.to_string()),
        },
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Authorizer::require(&principal, Action::BookAppointment)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .book(principal.user_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewAllAppointments)?;

    let service = AppointmentService::new(ctx);
    Ok(Json(json!(service.list_all().await)))
}

/// The caller's own appointment history. No capability check beyond
/// authentication; the filter is the principal's own id.
#[axum::debug_handler]
pub async fn my_appointments(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(ctx);
    Ok(Json(json!(service.list_for_patient(&principal.user_id).await)))
}

#[axum::debug_handler]
pub async fn patient_appointments(
    State(ctx): State<Arc<AppContext>>,
    Path(patient_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require_self_or_admin(&principal, patient_id)?;

    let service = AppointmentService::new(ctx);
    Ok(Json(json!(service.list_for_patient(&patient_id).await)))
}

#[axum::debug_handler]
pub async fn approve_appointment(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ManageAppointments)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .approve(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Appointment approved",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn reject_appointment(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ManageAppointments)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .reject(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Appointment rejected",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn start_consultation(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::RecordConsultation)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .start_consultation(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Consultation started",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn complete_consultation(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CompleteConsultationRequest>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::RecordConsultation)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .complete_consultation(&appointment_id, principal.user_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Consultation completed",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ManageAppointments)?;

    let service = AppointmentService::new(ctx);
    service
        .delete(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Appointment deleted",
        "id": appointment_id
    })))
}

#[axum::debug_handler]
pub async fn list_consultations(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewAllAppointments)?;

    let service = AppointmentService::new(ctx);
    Ok(Json(json!(service.consultations().await)))
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(ctx): State<Arc<AppContext>>,
    Path(appointment_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewAllAppointments)?;

    let service = AppointmentService::new(ctx);
    let appointment = service
        .consultation(&appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn appointment_reports(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewReports)?;

    let reporting = ReportingService::new(ctx);
    Ok(Json(json!(reporting.generate().await)))
}
