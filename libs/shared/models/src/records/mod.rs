//! Persisted document types shared across cells.

pub mod account;
pub mod appointment;
pub mod medicine;
pub mod notification;

pub use account::UserAccount;
pub use appointment::{Appointment, AppointmentStatus, PrescribedMedicine, VisitType, Vitals};
pub use medicine::{DispenseRecord, DispenseSource, Medicine};
pub use notification::{Notification, NotificationKind, RecipientType};
