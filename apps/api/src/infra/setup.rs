use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        backup::{ExternalDumpWriter, SqliteSnapshotWriter},
        http::app_state::AppState,
    },
    infra::{
        InfraError,
        config::AppConfig,
        maintenance_flag::{InMemoryMaintenanceFlag, RedisMaintenanceFlag},
        sqlite_persistence,
    },
    use_cases::{
        backup::{BackupUseCases, SnapshotWriter},
        maintenance::{MaintenanceFlag, MaintenanceUseCases},
        waitlist::{WaitlistRepo, WaitlistUseCases},
    },
};

/// Wire every collaborator. The pool is returned separately so `main` can
/// close it after the final backup.
pub async fn init_app_state(config: AppConfig) -> Result<(AppState, SqlitePool), InfraError> {
    if config.maintenance_enable_path == config.maintenance_disable_path {
        return Err(InfraError::Config(
            "MAINTENANCE_ENABLE_PATH and MAINTENANCE_DISABLE_PATH must differ".into(),
        ));
    }

    let persistence =
        sqlite_persistence(&config.database_url, config.database_max_connections).await?;
    let pool = persistence.pool().clone();
    let waitlist_repo = Arc::new(persistence) as Arc<dyn WaitlistRepo>;

    std::fs::create_dir_all(&config.backup.dir).map_err(|source| InfraError::BackupDir {
        path: config.backup.dir.display().to_string(),
        source,
    })?;

    let writer: Arc<dyn SnapshotWriter> = match config.backup.command.as_deref() {
        Some(command_line) => {
            let writer = ExternalDumpWriter::from_command_line(
                command_line,
                config.backup.command_timeout,
            )
            .ok_or_else(|| InfraError::Config("BACKUP_COMMAND is empty".into()))?;
            info!(program = %writer.program(), "Backups use external dump command");
            Arc::new(writer)
        }
        None => Arc::new(SqliteSnapshotWriter::new(pool.clone())),
    };

    let backup_use_cases = Arc::new(BackupUseCases::new(
        writer,
        config.backup.dir.clone(),
        config.backup.retain,
    ));

    let waitlist_use_cases = WaitlistUseCases::new(
        waitlist_repo,
        backup_use_cases.clone(),
        config.backup.every_n_inserts,
        config.backup.before_clear,
    );

    let flag: Arc<dyn MaintenanceFlag> = match config.redis_url.as_deref() {
        Some(redis_url) => {
            let flag = RedisMaintenanceFlag::new(redis_url, config.maintenance_mode).await?;
            info!("Maintenance flag stored in Redis");
            Arc::new(flag)
        }
        None => Arc::new(InMemoryMaintenanceFlag::new(config.maintenance_mode)),
    };

    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set, admin routes are unauthenticated");
    }

    let app_state = AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
        backup_use_cases,
        maintenance_use_cases: Arc::new(MaintenanceUseCases::new(flag)),
    };

    Ok((app_state, pool))
}

pub fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waitlist_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let mut file_error = None;
    let json_layer = log_file.and_then(|path| match File::create(path) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        ),
        Err(e) => {
            file_error = Some((path.display().to_string(), e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    if let Some((path, error)) = file_error {
        warn!(path = %path, error = %error, "Cannot open log file, logging to console only");
    }
}
