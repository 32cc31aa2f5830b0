use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::info;

use waitlist_api::{
    domain::entities::backup::BackupTrigger,
    infra::{
        InfraError,
        app::create_app,
        backup_scheduler::run_backup_loop,
        config::AppConfig,
        setup::{init_app_state, init_tracing},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.log_file.as_deref());

    let (app_state, pool) = init_app_state(config).await?;

    let bind_addr = app_state.config.bind_addr;

    // Spawn the periodic backup task (after tracing is initialized)
    if let Some(every) = app_state.config.backup.interval {
        let backups = app_state.backup_use_cases.clone();
        tokio::spawn(async move {
            run_backup_loop(backups, every).await;
        });
    } else {
        info!("Periodic backups disabled");
    }

    let backups = app_state.backup_use_cases.clone();
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(InfraError::Server)?;

    info!("Server stopped, taking final backup");
    backups.run_logged(BackupTrigger::Shutdown).await;
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
