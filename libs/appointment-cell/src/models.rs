use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventory_cell::models::InventoryError;
use shared_models::records::{AppointmentStatus, PrescribedMedicine, VisitType, Vitals};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub purpose: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub visit_type: Option<VisitType>,
}

/// Clinical record written when a consultation is completed. Absent fields
/// leave whatever is already on the appointment untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteConsultationRequest {
    pub chief_complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub management: Option<String>,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub prescribed_medicines: Vec<PrescribedMedicine>,
    #[serde(default)]
    pub referred_to_physician: bool,
    pub physician_name: Option<String>,
    pub visit_type: Option<VisitType>,
    pub consultation_completed_at: Option<DateTime<Utc>>,
}

// ==============================================================================
// REPORTING MODELS
// ==============================================================================

/// Summary statistics computed over the full appointment collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentReport {
    pub total_appointments: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub in_consultation: usize,
    pub completed: usize,
    pub scheduled: usize,
    pub walk_in: usize,
    pub rescheduled: usize,
    pub top_diagnosis: String,
    pub top_complaint: String,
    /// Percentage of appointments referred to a physician, rounded; 0 when
    /// there are no appointments at all.
    pub referral_rate: u32,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("{required}")]
    InvalidTransition {
        from: AppointmentStatus,
        required: &'static str,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Stock(#[from] InventoryError),
}
