use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::records::{DispenseSource, Medicine};
use shared_store::AppContext;

use crate::models::{DeductionSummary, DemandLine, InventoryError};
use crate::services::ledger::{append_history, reconcile_for_demand};

/// Applies a list of prescribed-medicine demands in order.
///
/// Unknown medicine ids and non-positive quantities are skipped with a
/// warning. A valid line that the stock cannot cover aborts the whole call;
/// lines applied before that point stay applied (the multi-line loop is not
/// wrapped in a cross-document transaction). Each individual line runs as a
/// conditional update under the batch's write lock, so concurrent demands
/// cannot race past the stock check on the same batch.
pub struct DeductionProcessor {
    ctx: Arc<AppContext>,
}

impl DeductionProcessor {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub async fn apply(
        &self,
        lines: &[DemandLine],
        dispensed_by: Option<Uuid>,
        source: DispenseSource,
    ) -> Result<DeductionSummary, InventoryError> {
        let mut applied = 0;
        let mut skipped = 0;

        for line in lines {
            let Some(med) = self.ctx.store.medicines.get(&line.medicine_id).await else {
                warn!("Skipping demand for unknown medicine {}", line.medicine_id);
                skipped += 1;
                continue;
            };

            if line.quantity <= 0 {
                warn!("Invalid quantity for {}: {}", med.name, line.quantity);
                skipped += 1;
                continue;
            }

            let outcome = self
                .ctx
                .store
                .medicines
                .try_update(&line.medicine_id, |m| {
                    reconcile_for_demand(m, line.quantity)?;
                    append_history(m, line.quantity, dispensed_by, line.appointment_id, source);
                    m.updated_at = Utc::now();
                    Ok::<(), InventoryError>(())
                })
                .await;

            match outcome {
                None => {
                    // Batch deleted between lookup and update.
                    warn!("Medicine {} disappeared mid-deduction", line.medicine_id);
                    skipped += 1;
                }
                Some(Err(e)) => return Err(e),
                Some(Ok(_)) => {
                    debug!("Deducted {} unit(s) of {}", line.quantity, med.name);
                    applied += 1;
                }
            }
        }

        Ok(DeductionSummary { applied, skipped })
    }

    /// Standalone dispensing: the one-element-list case of [`apply`], after
    /// the handler has resolved the batch and validated the quantity.
    pub async fn dispense(
        &self,
        medicine_id: Uuid,
        quantity: i64,
        dispensed_by: Option<Uuid>,
    ) -> Result<Medicine, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::Validation(
                "Quantity must be a positive integer".to_string(),
            ));
        }

        let line = DemandLine {
            medicine_id,
            quantity,
            appointment_id: None,
        };
        let summary = self
            .apply(std::slice::from_ref(&line), dispensed_by, DispenseSource::Manual)
            .await?;

        if summary.applied == 0 {
            return Err(InventoryError::NotFound);
        }

        self.ctx
            .store
            .medicines
            .get(&medicine_id)
            .await
            .ok_or(InventoryError::NotFound)
    }
}
