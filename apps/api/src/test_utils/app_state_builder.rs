//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by in-memory doubles
//! and a temporary backup directory.

use std::sync::Arc;

use secrecy::SecretString;
use tempfile::TempDir;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::waitlist_entry::WaitlistEntry,
    infra::{
        config::{AppConfig, BackupConfig},
        maintenance_flag::InMemoryMaintenanceFlag,
    },
    test_utils::{FailingSnapshotWriter, InMemoryWaitlistRepo, MemorySnapshotWriter},
    use_cases::{
        backup::{BackupUseCases, SnapshotWriter},
        maintenance::MaintenanceUseCases,
        waitlist::WaitlistUseCases,
    },
};

/// Everything a test may want to inspect after driving the router.
pub struct TestApp {
    pub state: AppState,
    pub repo: Arc<InMemoryWaitlistRepo>,
    pub writer: Arc<MemorySnapshotWriter>,
    /// Dropped with the `TestApp`.
    pub backup_dir: TempDir,
}

#[derive(Default)]
pub struct TestAppStateBuilder {
    entries: Vec<WaitlistEntry>,
    admin_token: Option<String>,
    maintenance: bool,
    maintenance_paths: Option<(String, String)>,
    failing_backups: bool,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, entries: Vec<WaitlistEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_admin_token(mut self, token: &str) -> Self {
        self.admin_token = Some(token.to_string());
        self
    }

    pub fn with_maintenance(mut self, enabled: bool) -> Self {
        self.maintenance = enabled;
        self
    }

    pub fn with_maintenance_paths(mut self, enable: &str, disable: &str) -> Self {
        self.maintenance_paths = Some((enable.to_string(), disable.to_string()));
        self
    }

    /// Every snapshot attempt fails.
    pub fn with_failing_backups(mut self) -> Self {
        self.failing_backups = true;
        self
    }

    pub fn build(self) -> TestApp {
        let backup_dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryWaitlistRepo::with_entries(self.entries));
        let writer = Arc::new(MemorySnapshotWriter::new());

        let snapshot_writer: Arc<dyn SnapshotWriter> = if self.failing_backups {
            Arc::new(FailingSnapshotWriter)
        } else {
            writer.clone()
        };

        let mut config = AppConfig {
            admin_token: self.admin_token.map(|t| SecretString::new(t.into())),
            maintenance_mode: self.maintenance,
            log_file: None,
            backup: BackupConfig {
                dir: backup_dir.path().to_path_buf(),
                interval: None,
                // Milestones spawn background work that would outlive the test.
                every_n_inserts: 0,
                ..BackupConfig::default()
            },
            ..AppConfig::default()
        };
        if let Some((enable, disable)) = self.maintenance_paths {
            config.maintenance_enable_path = enable;
            config.maintenance_disable_path = disable;
        }

        let backup_use_cases = Arc::new(BackupUseCases::new(
            snapshot_writer,
            config.backup.dir.clone(),
            config.backup.retain,
        ));
        let waitlist_use_cases = WaitlistUseCases::new(
            repo.clone(),
            backup_use_cases.clone(),
            config.backup.every_n_inserts,
            config.backup.before_clear,
        );
        let maintenance_use_cases = MaintenanceUseCases::new(Arc::new(
            InMemoryMaintenanceFlag::new(config.maintenance_mode),
        ));

        let state = AppState {
            config: Arc::new(config),
            waitlist_use_cases: Arc::new(waitlist_use_cases),
            backup_use_cases,
            maintenance_use_cases: Arc::new(maintenance_use_cases),
        };

        TestApp {
            state,
            repo,
            writer,
            backup_dir,
        }
    }
}
