use uuid::Uuid;

use crate::auth::{Principal, Role};
use crate::error::AppError;

/// Operations a caller can be granted. Every protected handler names the
/// capability it needs instead of inspecting roles inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BookAppointment,
    ViewAllAppointments,
    ManageAppointments,
    RecordConsultation,
    ViewReports,
    ViewInventory,
    ManageInventory,
    RemoveMedicine,
    DispenseMedicine,
    ViewNotifications,
    PublishNotifications,
}

pub struct Authorizer;

impl Authorizer {
    pub fn allows(role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Doctor | Role::Nurse => matches!(
                action,
                Action::ViewAllAppointments
                    | Action::RecordConsultation
                    | Action::ViewReports
                    | Action::ViewInventory
                    | Action::ManageInventory
                    | Action::DispenseMedicine
                    | Action::ViewNotifications
                    | Action::PublishNotifications
            ),
            Role::Patient => matches!(
                action,
                Action::BookAppointment | Action::ViewNotifications
            ),
        }
    }

    pub fn require(principal: &Principal, action: Action) -> Result<(), AppError> {
        if Self::allows(principal.role, action) {
            Ok(())
        } else {
            Err(AppError::AccessDenied("Access denied".to_string()))
        }
    }

    /// Owner-scoped reads: the resource owner or an admin may proceed.
    pub fn require_self_or_admin(principal: &Principal, owner_id: Uuid) -> Result<(), AppError> {
        if principal.user_id == owner_id || principal.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::AccessDenied("Access denied".to_string()))
        }
    }
}
