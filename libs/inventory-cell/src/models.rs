use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeMedicineRequest {
    pub name: String,
    #[serde(default)]
    pub loose_units: i64,
    #[serde(default)]
    pub sealed_containers: i64,
    #[serde(default)]
    pub units_per_container: i64,
    pub unit: Option<String>,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispenseRequest {
    pub quantity: i64,
}

/// One prescribed-medicine demand, optionally tied to an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandLine {
    pub medicine_id: Uuid,
    pub quantity: i64,
    pub appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductRequest {
    pub prescribed: Vec<DemandLine>,
}

/// Outcome of a deduction run: how many lines were applied and how many
/// were skipped as unknown/invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionSummary {
    pub applied: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InventoryError {
    #[error("Medicine not found")]
    NotFound,

    #[error("Not enough stock for {name}")]
    InsufficientStock { name: String },

    #[error("Validation error: {0}")]
    Validation(String),
}
