use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::InfraError;
use crate::{
    app_error::{AppError, AppResult},
    use_cases::maintenance::MaintenanceFlag,
};

const MAINTENANCE_KEY: &str = "waitlist:maintenance";

/// Process-local flag. Used when no Redis is configured.
#[derive(Debug, Default)]
pub struct InMemoryMaintenanceFlag {
    enabled: AtomicBool,
}

impl InMemoryMaintenanceFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }
}

#[async_trait]
impl MaintenanceFlag for InMemoryMaintenanceFlag {
    async fn is_enabled(&self) -> AppResult<bool> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn set_enabled(&self, enabled: bool) -> AppResult<()> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}

/// Flag shared by all instances through Redis.
#[derive(Clone)]
pub struct RedisMaintenanceFlag {
    manager: ConnectionManager,
}

impl RedisMaintenanceFlag {
    /// Connect, and seed the key with `initial` unless another instance already set it.
    pub async fn new(redis_url: &str, initial: bool) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let mut manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;

        let _: bool = manager
            .set_nx(MAINTENANCE_KEY, encode(initial))
            .await
            .map_err(InfraError::RedisConnection)?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl MaintenanceFlag for RedisMaintenanceFlag {
    async fn is_enabled(&self) -> AppResult<bool> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn
            .get(MAINTENANCE_KEY)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(raw.as_deref() == Some("1"))
    }

    async fn set_enabled(&self, enabled: bool) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .set(MAINTENANCE_KEY, encode(enabled))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}

fn encode(enabled: bool) -> &'static str {
    if enabled { "1" } else { "0" }
}
