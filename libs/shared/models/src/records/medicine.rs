use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medicine stock batch, identified by name + calendar day of expiry.
/// Names are not unique: the same drug restocked with a different expiry
/// date becomes a separate batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    /// Individually dispensable units held outside sealed containers.
    pub loose_units: i64,
    /// Unopened containers, convertible to loose units on demand.
    pub sealed_containers: i64,
    pub units_per_container: i64,
    pub unit: Option<String>,
    pub expiry_date: DateTime<Utc>,
    /// Derived from the counts; recomputed after every mutation, never
    /// maintained independently.
    pub available: bool,
    /// Append-only audit trail of deductions.
    pub dispense_history: Vec<DispenseRecord>,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    pub fn recompute_available(&mut self) {
        self.available = self.loose_units > 0 || self.sealed_containers > 0;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispenseRecord {
    pub demanded_quantity: i64,
    pub dispensed_at: DateTime<Utc>,
    pub dispensed_by: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub source: DispenseSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispenseSource {
    Manual,
    Consultation,
}
