use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub status: AppointmentStatus,

    // Patient booking fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub purpose: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub visit_type: Option<VisitType>,

    // Clinical fields, filled in during consultation
    pub chief_complaint: Option<String>,
    pub vitals: Vitals,
    pub diagnosis: Option<String>,
    pub management: Option<String>,
    pub prescribed_medicines: Vec<PrescribedMedicine>,
    pub referred_to_physician: bool,
    pub physician_name: Option<String>,

    pub consultation_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// An appointment counts as a consultation record once a diagnosis
    /// has been written.
    pub fn is_consultation(&self) -> bool {
        self.diagnosis.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    InConsultation,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
            AppointmentStatus::InConsultation => write!(f, "in_consultation"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    Scheduled,
    WalkIn,
    Rescheduled,
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitType::Scheduled => write!(f, "scheduled"),
            VisitType::WalkIn => write!(f, "walk_in"),
            VisitType::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

/// Vitals taken at consultation time. Free-form strings, as recorded by
/// clinic staff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vitals {
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub heart_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
    pub bmi: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescribedMedicine {
    pub medicine_id: Uuid,
    pub quantity: i64,
}
