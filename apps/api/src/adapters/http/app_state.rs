use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        backup::BackupUseCases, maintenance::MaintenanceUseCases, waitlist::WaitlistUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub waitlist_use_cases: Arc<WaitlistUseCases>,
    pub backup_use_cases: Arc<BackupUseCases>,
    pub maintenance_use_cases: Arc<MaintenanceUseCases>,
}
