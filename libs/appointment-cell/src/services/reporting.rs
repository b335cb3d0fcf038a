use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use shared_models::records::{Appointment, AppointmentStatus, VisitType};
use shared_store::AppContext;

use crate::models::AppointmentReport;

/// Placeholder emitted when a frequency question has no answer at all.
const NO_DATA: &str = "N/A";

pub struct ReportingService {
    ctx: Arc<AppContext>,
}

impl ReportingService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Computes the full summary over every appointment on record. All
    /// counters are derived in one pass over a snapshot of the collection.
    pub async fn generate(&self) -> AppointmentReport {
        let appointments = self.ctx.store.appointments.all().await;
        debug!("Generating report over {} appointments", appointments.len());

        let diagnoses: Vec<&str> = appointments
            .iter()
            .filter_map(|a| a.diagnosis.as_deref())
            .collect();
        // The complaint ranking reads the booking purpose, which every
        // appointment carries, rather than the clinical chief complaint.
        let complaints: Vec<&str> = appointments
            .iter()
            .filter_map(|a| a.purpose.as_deref())
            .collect();

        AppointmentReport {
            total_appointments: appointments.len(),
            pending: count_by_status(&appointments, AppointmentStatus::Pending),
            approved: count_by_status(&appointments, AppointmentStatus::Approved),
            rejected: count_by_status(&appointments, AppointmentStatus::Rejected),
            in_consultation: count_by_status(&appointments, AppointmentStatus::InConsultation),
            completed: count_by_status(&appointments, AppointmentStatus::Completed),
            scheduled: count_by_visit_type(&appointments, VisitType::Scheduled),
            walk_in: count_by_visit_type(&appointments, VisitType::WalkIn),
            rescheduled: count_by_visit_type(&appointments, VisitType::Rescheduled),
            top_diagnosis: most_common(&diagnoses),
            top_complaint: most_common(&complaints),
            referral_rate: referral_rate(&appointments),
        }
    }
}

pub fn count_by_status(appointments: &[Appointment], status: AppointmentStatus) -> usize {
    appointments.iter().filter(|a| a.status == status).count()
}

pub fn count_by_visit_type(appointments: &[Appointment], visit_type: VisitType) -> usize {
    appointments
        .iter()
        .filter(|a| a.visit_type == Some(visit_type))
        .count()
}

/// Most frequently occurring value, ignoring empty strings. Ties resolve to
/// whichever contender sorts first in the frequency pass, which is not
/// specified further. Empty input yields the `N/A` placeholder.
pub fn most_common(values: &[&str]) -> String {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        *freq.entry(trimmed).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .first()
        .map(|(value, _)| value.to_string())
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Percentage of appointments referred onward, rounded to the nearest whole
/// number. Zero when there are no appointments.
pub fn referral_rate(appointments: &[Appointment]) -> u32 {
    if appointments.is_empty() {
        return 0;
    }
    let referred = appointments.iter().filter(|a| a.referred_to_physician).count();
    ((referred as f64 / appointments.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            status,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            address: None,
            purpose: None,
            appointment_date: None,
            visit_type: None,
            chief_complaint: None,
            vitals: Default::default(),
            diagnosis: None,
            management: None,
            prescribed_medicines: vec![],
            referred_to_physician: false,
            physician_name: None,
            consultation_completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn most_common_of_nothing_is_placeholder() {
        assert_eq!(most_common(&[]), "N/A");
    }

    #[test]
    fn most_common_ignores_empty_strings() {
        assert_eq!(most_common(&["", "  ", ""]), "N/A");
    }

    #[test]
    fn most_common_picks_the_mode() {
        assert_eq!(most_common(&["flu", "flu", "cough"]), "flu");
        assert_eq!(most_common(&["cough", "flu", "flu", "cough", "flu"]), "flu");
    }

    #[test]
    fn referral_rate_of_nothing_is_zero() {
        assert_eq!(referral_rate(&[]), 0);
    }

    #[test]
    fn referral_rate_rounds_to_whole_percent() {
        let mut appointments = vec![
            appointment(AppointmentStatus::Completed),
            appointment(AppointmentStatus::Completed),
            appointment(AppointmentStatus::Completed),
        ];
        appointments[0].referred_to_physician = true;
        // 1/3 = 33.33..% rounds down to 33
        assert_eq!(referral_rate(&appointments), 33);

        appointments[1].referred_to_physician = true;
        // 2/3 = 66.66..% rounds up to 67
        assert_eq!(referral_rate(&appointments), 67);
    }

    #[test]
    fn status_counts_only_match_their_bucket() {
        let appointments = vec![
            appointment(AppointmentStatus::Pending),
            appointment(AppointmentStatus::Pending),
            appointment(AppointmentStatus::Completed),
        ];
        assert_eq!(count_by_status(&appointments, AppointmentStatus::Pending), 2);
        assert_eq!(count_by_status(&appointments, AppointmentStatus::Completed), 1);
        assert_eq!(count_by_status(&appointments, AppointmentStatus::Rejected), 0);
    }

    #[test]
    fn visit_type_counts_skip_unset_appointments() {
        let mut appointments = vec![
            appointment(AppointmentStatus::Completed),
            appointment(AppointmentStatus::Completed),
        ];
        appointments[0].visit_type = Some(VisitType::WalkIn);
        assert_eq!(count_by_visit_type(&appointments, VisitType::WalkIn), 1);
        assert_eq!(count_by_visit_type(&appointments, VisitType::Scheduled), 0);
    }
}
