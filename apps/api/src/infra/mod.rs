use crate::{adapters::persistence::SqlitePersistence, infra::db::init_db};

pub mod app;
pub mod backup_scheduler;
pub mod config;
pub mod db;
mod error;
pub mod maintenance_flag;
pub mod setup;

pub use error::InfraError;

pub async fn sqlite_persistence(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePersistence, InfraError> {
    let pool = init_db(database_url, max_connections).await?;
    let persistence = SqlitePersistence::new(pool);
    Ok(persistence)
}
