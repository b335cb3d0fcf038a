use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use inventory_cell::models::DemandLine;
use inventory_cell::services::dispense::DeductionProcessor;
use notification_cell::services::dispatcher::NotificationDispatcher;
use shared_models::records::{
    Appointment, AppointmentStatus, DispenseSource, NotificationKind,
};
use shared_store::AppContext;

use crate::models::{AppointmentError, BookAppointmentRequest, CompleteConsultationRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentService {
    ctx: Arc<AppContext>,
    lifecycle: AppointmentLifecycleService,
    dispatcher: NotificationDispatcher,
    processor: DeductionProcessor,
}

impl AppointmentService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            lifecycle: AppointmentLifecycleService::new(),
            dispatcher: NotificationDispatcher::new(ctx.clone()),
            processor: DeductionProcessor::new(ctx.clone()),
            ctx,
        }
    }

    /// Creates a pending appointment for the given patient and posts a
    /// request notice to the admin feed.
    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "First name and last name are required".to_string(),
            ));
        }

        let now = Utc::now();
        let appointment = self
            .ctx
            .store
            .appointments
            .insert(Appointment {
                id: Uuid::new_v4(),
                patient_id,
                status: AppointmentStatus::Pending,
                first_name: Some(request.first_name.trim().to_string()),
                last_name: Some(request.last_name.trim().to_string()),
                email: request.email,
                phone: request.phone,
                address: request.address,
                purpose: request.purpose,
                appointment_date: request.appointment_date,
                visit_type: request.visit_type,
                chief_complaint: None,
                vitals: Default::default(),
                diagnosis: None,
                management: None,
                prescribed_medicines: vec![],
                referred_to_physician: false,
                physician_name: None,
                consultation_completed_at: None,
                created_at: now,
                updated_at: now,
            })
            .await;

        info!("Appointment {} booked by patient {}", appointment.id, patient_id);

        self.dispatcher
            .notify_admins(
                format!(
                    "New appointment request from {} {}",
                    appointment.first_name.as_deref().unwrap_or(""),
                    appointment.last_name.as_deref().unwrap_or(""),
                ),
                NotificationKind::Appointment,
            )
            .await;

        Ok(appointment)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        self.ctx
            .store
            .appointments
            .get(id)
            .await
            .ok_or(AppointmentError::NotFound)
    }

    /// Every appointment on record, most recent appointment date first.
    pub async fn list_all(&self) -> Vec<Appointment> {
        let mut appointments = self.ctx.store.appointments.all().await;
        appointments.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        appointments
    }

    pub async fn list_for_patient(&self, patient_id: &Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .ctx
            .store
            .appointments
            .filter(|a| a.patient_id == *patient_id)
            .await;
        appointments.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        appointments
    }

    pub async fn approve(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .transition(id, AppointmentStatus::Approved)
            .await?;
        self.dispatcher
            .notify_user(
                appointment.patient_id,
                "Your appointment has been approved",
                NotificationKind::Appointment,
            )
            .await;
        Ok(appointment)
    }

    pub async fn reject(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .transition(id, AppointmentStatus::Rejected)
            .await?;
        self.dispatcher
            .notify_user(
                appointment.patient_id,
                "Your appointment has been rejected",
                NotificationKind::Appointment,
            )
            .await;
        Ok(appointment)
    }

    pub async fn start_consultation(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .transition(id, AppointmentStatus::InConsultation)
            .await?;
        self.dispatcher
            .notify_user(
                appointment.patient_id,
                "Your consultation has started",
                NotificationKind::Appointment,
            )
            .await;
        Ok(appointment)
    }

    /// Records the clinical outcome and moves the appointment to completed.
    ///
    /// Prescribed medicines are deducted from stock first. A line the stock
    /// cannot cover aborts the call and the appointment stays in
    /// consultation; lines deducted before the failing one stay deducted.
    pub async fn complete_consultation(
        &self,
        id: &Uuid,
        completed_by: Uuid,
        request: CompleteConsultationRequest,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get(id).await?;
        self.lifecycle
            .validate_status_transition(&current.status, &AppointmentStatus::Completed)?;

        if !request.prescribed_medicines.is_empty() {
            let lines: Vec<DemandLine> = request
                .prescribed_medicines
                .iter()
                .map(|p| DemandLine {
                    medicine_id: p.medicine_id,
                    quantity: p.quantity,
                    appointment_id: Some(*id),
                })
                .collect();

            let summary = self
                .processor
                .apply(&lines, Some(completed_by), DispenseSource::Consultation)
                .await?;
            if summary.skipped > 0 {
                warn!(
                    "Consultation {}: {} prescription line(s) skipped",
                    id, summary.skipped
                );
            }
        }

        let outcome = self
            .ctx
            .store
            .appointments
            .try_update(id, |a| {
                // Revalidate under the lock; stock deduction above ran
                // outside it.
                self.lifecycle
                    .validate_status_transition(&a.status, &AppointmentStatus::Completed)?;

                a.status = AppointmentStatus::Completed;
                a.chief_complaint = request.chief_complaint.clone().or(a.chief_complaint.take());
                a.diagnosis = request.diagnosis.clone().or(a.diagnosis.take());
                a.management = request.management.clone().or(a.management.take());
                a.vitals = request.vitals.clone();
                a.prescribed_medicines = request.prescribed_medicines.clone();
                a.referred_to_physician = request.referred_to_physician;
                a.physician_name = request.physician_name.clone();
                if let Some(visit_type) = request.visit_type {
                    a.visit_type = Some(visit_type);
                }
                a.consultation_completed_at =
                    Some(request.consultation_completed_at.unwrap_or_else(Utc::now));
                a.updated_at = Utc::now();
                Ok::<(), AppointmentError>(())
            })
            .await;

        let appointment = match outcome {
            None => return Err(AppointmentError::NotFound),
            Some(result) => result?,
        };

        debug!("Consultation {} completed", id);
        self.dispatcher
            .notify_user(
                appointment.patient_id,
                "Your consultation has been completed",
                NotificationKind::Appointment,
            )
            .await;

        Ok(appointment)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        self.ctx
            .store
            .appointments
            .remove(id)
            .await
            .ok_or(AppointmentError::NotFound)
    }

    /// Appointments that have a consultation record, most recently completed
    /// first.
    pub async fn consultations(&self) -> Vec<Appointment> {
        let mut records = self
            .ctx
            .store
            .appointments
            .filter(Appointment::is_consultation)
            .await;
        records.sort_by(|a, b| b.consultation_completed_at.cmp(&a.consultation_completed_at));
        records
    }

    pub async fn consultation(&self, id: &Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(id).await?;
        if !appointment.is_consultation() {
            return Err(AppointmentError::NotFound);
        }
        Ok(appointment)
    }

    /// Status-only transition with a notification-free core. Validation runs
    /// inside the conditional update so two racing callers cannot both move
    /// the same appointment.
    async fn transition(
        &self,
        id: &Uuid,
        target: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let outcome = self
            .ctx
            .store
            .appointments
            .try_update(id, |a| {
                self.lifecycle.validate_status_transition(&a.status, &target)?;
                a.status = target;
                a.updated_at = Utc::now();
                Ok::<(), AppointmentError>(())
            })
            .await;

        match outcome {
            None => Err(AppointmentError::NotFound),
            Some(result) => {
                let appointment = result?;
                info!("Appointment {} moved to {}", id, target);
                Ok(appointment)
            }
        }
    }
}
