use tracing::{debug, warn};

use shared_models::records::AppointmentStatus;

use crate::models::AppointmentError;

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        let valid_transitions = self.get_valid_transitions(current_status);

        if !valid_transitions.contains(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidTransition {
                from: *current_status,
                required: required_precondition(new_status),
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Approved,
                AppointmentStatus::Rejected,
            ],
            AppointmentStatus::Approved => vec![AppointmentStatus::InConsultation],
            AppointmentStatus::InConsultation => vec![AppointmentStatus::Completed],
            // Terminal states - no transitions allowed
            AppointmentStatus::Rejected => vec![],
            AppointmentStatus::Completed => vec![],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

/// The precondition a caller must satisfy to reach the given status.
fn required_precondition(target: &AppointmentStatus) -> &'static str {
    match target {
        AppointmentStatus::Approved => "Only pending appointments can be approved",
        AppointmentStatus::Rejected => "Only pending appointments can be rejected",
        AppointmentStatus::InConsultation => "Only approved appointments can begin consultation",
        AppointmentStatus::Completed => "Only in-consultation appointments can be completed",
        AppointmentStatus::Pending => "Appointments cannot return to pending",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn happy_path_transitions_are_allowed() {
        let lifecycle = AppointmentLifecycleService::new();
        let steps = [
            (AppointmentStatus::Pending, AppointmentStatus::Approved),
            (AppointmentStatus::Approved, AppointmentStatus::InConsultation),
            (AppointmentStatus::InConsultation, AppointmentStatus::Completed),
            (AppointmentStatus::Pending, AppointmentStatus::Rejected),
        ];
        for (from, to) in steps {
            assert!(lifecycle.validate_status_transition(&from, &to).is_ok());
        }
    }

    #[test]
    fn skipping_straight_to_completed_is_rejected() {
        let lifecycle = AppointmentLifecycleService::new();
        let err = lifecycle
            .validate_status_transition(&AppointmentStatus::Pending, &AppointmentStatus::Completed)
            .unwrap_err();
        assert_matches!(
            err,
            AppointmentError::InvalidTransition { from: AppointmentStatus::Pending, required }
                if required == "Only in-consultation appointments can be completed"
        );
    }

    #[test]
    fn consultation_requires_approval_first() {
        let lifecycle = AppointmentLifecycleService::new();
        let err = lifecycle
            .validate_status_transition(
                &AppointmentStatus::Pending,
                &AppointmentStatus::InConsultation,
            )
            .unwrap_err();
        assert_matches!(
            err,
            AppointmentError::InvalidTransition { required, .. }
                if required == "Only approved appointments can begin consultation"
        );
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        let lifecycle = AppointmentLifecycleService::new();
        assert!(lifecycle
            .get_valid_transitions(&AppointmentStatus::Rejected)
            .is_empty());
        assert!(lifecycle
            .get_valid_transitions(&AppointmentStatus::Completed)
            .is_empty());
    }
}
