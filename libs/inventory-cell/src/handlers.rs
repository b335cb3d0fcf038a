use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Principal;
use shared_models::authz::{Action, Authorizer};
use shared_models::error::AppError;
use shared_models::records::DispenseSource;
use shared_store::AppContext;

use crate::models::{DeductRequest, DispenseRequest, IntakeMedicineRequest, InventoryError};
use crate::services::dispense::DeductionProcessor;
use crate::services::ledger::StockLedgerService;

fn map_inventory_error(e: InventoryError) -> AppError {
    match e {
        InventoryError::NotFound => AppError::NotFound("Medicine not found".to_string()),
        InventoryError::InsufficientStock { .. } => AppError::InsufficientStock(e.to_string()),
        InventoryError::Validation(msg) => AppError::ValidationError(msg),
    }
}

#[axum::debug_handler]
pub async fn list_medicines(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::ViewInventory)?;

    let ledger = StockLedgerService::new(ctx);
    let medicines = ledger.list().await;

    Ok(Json(json!(medicines)))
}

#[axum::debug_handler]
pub async fn intake_medicine(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<IntakeMedicineRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Authorizer::require(&principal, Action::ManageInventory)?;

    let ledger = StockLedgerService::new(ctx);
    let (batch, created) = ledger
        .intake(request, Some(principal.user_id))
        .await
        .map_err(map_inventory_error)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(json!(batch))))
}

#[axum::debug_handler]
pub async fn dispense_medicine(
    State(ctx): State<Arc<AppContext>>,
    Path(medicine_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<DispenseRequest>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::DispenseMedicine)?;

    // Resolve the batch up front so an unknown id is a 404 rather than a
    // silently skipped line.
    if ctx.store.medicines.get(&medicine_id).await.is_none() {
        return Err(AppError::NotFound("Medicine not found".to_string()));
    }

    let processor = DeductionProcessor::new(ctx);
    let medicine = processor
        .dispense(medicine_id, request.quantity, Some(principal.user_id))
        .await
        .map_err(map_inventory_error)?;

    Ok(Json(json!({
        "message": "Medicine dispensed",
        "medicine": medicine
    })))
}

#[axum::debug_handler]
pub async fn deduct_medicines(
    State(ctx): State<Arc<AppContext>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<DeductRequest>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::DispenseMedicine)?;

    let processor = DeductionProcessor::new(ctx);
    let summary = processor
        .apply(
            &request.prescribed,
            Some(principal.user_id),
            DispenseSource::Consultation,
        )
        .await
        .map_err(map_inventory_error)?;

    Ok(Json(json!({
        "success": true,
        "applied": summary.applied,
        "skipped": summary.skipped
    })))
}

#[axum::debug_handler]
pub async fn delete_medicine(
    State(ctx): State<Arc<AppContext>>,
    Path(medicine_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    Authorizer::require(&principal, Action::RemoveMedicine)?;

    let ledger = StockLedgerService::new(ctx);
    ledger
        .remove(&medicine_id)
        .await
        .map_err(map_inventory_error)?;

    Ok(Json(json!({
        "message": "Medicine deleted",
        "id": medicine_id
    })))
}
