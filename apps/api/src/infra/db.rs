use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use super::InfraError;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool, InfraError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(InfraError::DatabaseConnection)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(InfraError::DatabaseConnection)?;

    run_migrations(&pool).await?;

    info!("Connected to database!");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), InfraError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(InfraError::Migration)
}
