use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::app_error::AppResult;

/// Where the maintenance flag lives. Shared state, so every server
/// instance that points at the same store sees the same value.
#[async_trait]
pub trait MaintenanceFlag: Send + Sync {
    async fn is_enabled(&self) -> AppResult<bool>;
    async fn set_enabled(&self, enabled: bool) -> AppResult<()>;
}

#[derive(Clone)]
pub struct MaintenanceUseCases {
    flag: Arc<dyn MaintenanceFlag>,
}

impl MaintenanceUseCases {
    pub fn new(flag: Arc<dyn MaintenanceFlag>) -> Self {
        Self { flag }
    }

    pub async fn is_enabled(&self) -> AppResult<bool> {
        self.flag.is_enabled().await
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, enabled: bool) -> AppResult<bool> {
        self.flag.set_enabled(enabled).await?;
        info!(
            "Maintenance mode {}",
            if enabled { "ENABLED" } else { "DISABLED" }
        );
        Ok(enabled)
    }
}
