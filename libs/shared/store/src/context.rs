use shared_config::AppConfig;
use shared_models::records::{Appointment, Medicine, Notification, UserAccount};
use uuid::Uuid;

use crate::collection::{Collection, Document};

impl Document for UserAccount {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Document for Medicine {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Document for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Document for Notification {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// All collections the clinic persists.
pub struct ClinicStore {
    pub users: Collection<UserAccount>,
    pub medicines: Collection<Medicine>,
    pub appointments: Collection<Appointment>,
    pub notifications: Collection<Notification>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self {
            users: Collection::new(),
            medicines: Collection::new(),
            appointments: Collection::new(),
            notifications: Collection::new(),
        }
    }
}

impl Default for ClinicStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicitly constructed application context, threaded through every
/// handler as shared state. Replaces process-global connections and
/// secrets.
pub struct AppContext {
    pub config: AppConfig,
    pub store: ClinicStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: ClinicStore::new(),
        }
    }
}
