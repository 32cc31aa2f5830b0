use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::info;

use crate::{domain::entities::backup::BackupTrigger, use_cases::backup::BackupUseCases};

/// Take a scheduled backup every `every`, starting one interval after startup.
/// Runs forever; failures are logged by the use case.
pub async fn run_backup_loop(backups: Arc<BackupUseCases>, every: Duration) {
    info!(
        every_secs = every.as_secs(),
        dir = %backups.backup_dir().display(),
        "Starting backup scheduler"
    );

    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        backups.run_logged(BackupTrigger::Scheduled).await;
    }
}
