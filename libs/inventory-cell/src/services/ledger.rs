use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::records::{DispenseRecord, DispenseSource, Medicine};
use shared_store::AppContext;

use crate::models::{IntakeMedicineRequest, InventoryError};

/// Loose units plus whatever the sealed containers would yield if opened.
pub fn total_available_units(med: &Medicine) -> i64 {
    med.loose_units + med.sealed_containers * med.units_per_container
}

/// Deducts `quantity` loose units from the batch, opening sealed containers
/// one at a time as needed. Fails without touching the batch when the total
/// available stock cannot cover the demand.
///
/// Containers are opened lazily rather than bulk-opened so a partially used
/// container survives as loose units; a single large demand may open several
/// containers in one call.
pub fn reconcile_for_demand(med: &mut Medicine, quantity: i64) -> Result<(), InventoryError> {
    if total_available_units(med) < quantity {
        return Err(InventoryError::InsufficientStock {
            name: med.name.clone(),
        });
    }

    while med.loose_units < quantity {
        med.sealed_containers -= 1;
        med.loose_units += med.units_per_container;
    }

    med.loose_units -= quantity;
    med.recompute_available();
    Ok(())
}

/// Appends to the batch's audit trail. Existing entries are never edited
/// or removed.
pub fn append_history(
    med: &mut Medicine,
    quantity: i64,
    dispensed_by: Option<Uuid>,
    appointment_id: Option<Uuid>,
    source: DispenseSource,
) {
    med.dispense_history.push(DispenseRecord {
        demanded_quantity: quantity,
        dispensed_at: Utc::now(),
        dispensed_by,
        appointment_id,
        source,
    });
}

pub struct StockLedgerService {
    ctx: Arc<AppContext>,
}

impl StockLedgerService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> Vec<Medicine> {
        let mut medicines = self.ctx.store.medicines.all().await;
        medicines.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.expiry_date.cmp(&b.expiry_date))
        });
        medicines
    }

    pub async fn get(&self, id: &Uuid) -> Option<Medicine> {
        self.ctx.store.medicines.get(id).await
    }

    /// Records a stock intake. A batch with the same name and calendar day
    /// of expiry absorbs the new counts; otherwise a fresh batch is created.
    /// Returns the batch and whether it was newly created.
    pub async fn intake(
        &self,
        request: IntakeMedicineRequest,
        added_by: Option<Uuid>,
    ) -> Result<(Medicine, bool), InventoryError> {
        if request.name.trim().is_empty() {
            return Err(InventoryError::Validation("Medicine name is required".to_string()));
        }
        if request.loose_units < 0 || request.sealed_containers < 0 {
            return Err(InventoryError::Validation(
                "Stock counts cannot be negative".to_string(),
            ));
        }
        if request.units_per_container < 0 {
            return Err(InventoryError::Validation(
                "Units per container cannot be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let expiry_day = request.expiry_date.date_naive();
        let name = request.name.clone();

        let (batch, created) = self
            .ctx
            .store
            .medicines
            .upsert_where(
                |m| m.name == name && same_expiry_day(m, expiry_day),
                |m| {
                    m.loose_units += request.loose_units;
                    m.sealed_containers += request.sealed_containers;
                    m.recompute_available();
                    m.updated_at = now;
                },
                || {
                    let mut medicine = Medicine {
                        id: Uuid::new_v4(),
                        name: request.name.clone(),
                        loose_units: request.loose_units,
                        sealed_containers: request.sealed_containers,
                        units_per_container: request.units_per_container,
                        unit: request.unit.clone(),
                        expiry_date: request.expiry_date,
                        available: false,
                        dispense_history: Vec::new(),
                        added_by,
                        created_at: now,
                        updated_at: now,
                    };
                    medicine.recompute_available();
                    medicine
                },
            )
            .await;

        if created {
            info!("New medicine batch created: {} (expires {})", batch.name, expiry_day);
        } else {
            debug!("Stock intake merged into existing batch: {}", batch.name);
        }

        Ok((batch, created))
    }

    pub async fn remove(&self, id: &Uuid) -> Result<Medicine, InventoryError> {
        self.ctx
            .store
            .medicines
            .remove(id)
            .await
            .ok_or(InventoryError::NotFound)
    }
}

fn same_expiry_day(med: &Medicine, day: chrono::NaiveDate) -> bool {
    med.expiry_date.date_naive() == day
}
