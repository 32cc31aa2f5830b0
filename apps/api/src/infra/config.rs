use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_origin: HeaderValue,
    /// Bearer token for admin routes. When unset the routes are open.
    pub admin_token: Option<SecretString>,
    pub backup: BackupConfig,
    /// Initial value of the maintenance flag.
    pub maintenance_mode: bool,
    pub maintenance_enable_path: String,
    pub maintenance_disable_path: String,
    /// Shares the maintenance flag across instances when set.
    pub redis_url: Option<String>,
    /// JSON log file. Empty `LOG_FILE` disables file logging.
    pub log_file: Option<PathBuf>,
}

pub struct BackupConfig {
    pub dir: PathBuf,
    /// `None` disables the periodic task.
    pub interval: Option<Duration>,
    pub retain: usize,
    /// 0 disables milestone backups.
    pub every_n_inserts: u64,
    pub before_clear: bool,
    /// External dump command line. `VACUUM INTO` is used when unset.
    pub command: Option<String>,
    pub command_timeout: Duration,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("backups"),
            interval: Some(Duration::from_secs(6 * 60 * 60)),
            retain: 7,
            every_n_inserts: 10,
            before_clear: true,
            command: None,
            command_timeout: Duration::from_secs(300),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            database_url: "sqlite://waitlist.db".to_string(),
            database_max_connections: 5,
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            admin_token: None,
            backup: BackupConfig::default(),
            maintenance_mode: false,
            maintenance_enable_path: "/secret-maintenance-enable".to_string(),
            maintenance_disable_path: "/secret-maintenance-disable".to_string(),
            redis_url: None,
            log_file: Some(PathBuf::from("app.log")),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", defaults.bind_addr);
        let database_url: String = get_env_default("DATABASE_URL", defaults.database_url);
        let database_max_connections: u32 =
            get_env_default("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let admin_token = optional_env("ADMIN_TOKEN").map(|t| SecretString::new(t.into()));

        let interval_secs: u64 = get_env_default("BACKUP_INTERVAL_SECS", 21_600);
        let timeout_secs: u64 = get_env_default("BACKUP_COMMAND_TIMEOUT_SECS", 300);
        let backup = BackupConfig {
            dir: PathBuf::from(get_env_default("BACKUP_DIR", "backups".to_string())),
            // 0 turns the timer off; manual, milestone and shutdown backups still run.
            interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
            retain: get_env_default("BACKUP_RETAIN", defaults.backup.retain),
            every_n_inserts: get_env_default(
                "BACKUP_EVERY_N_INSERTS",
                defaults.backup.every_n_inserts,
            ),
            before_clear: get_env_default("BACKUP_BEFORE_CLEAR", defaults.backup.before_clear),
            command: optional_env("BACKUP_COMMAND"),
            command_timeout: Duration::from_secs(timeout_secs.max(1)),
        };

        let maintenance_mode: bool = get_env_default("MAINTENANCE_MODE", false);
        let maintenance_enable_path = normalize_path(&get_env_default(
            "MAINTENANCE_ENABLE_PATH",
            defaults.maintenance_enable_path,
        ));
        let maintenance_disable_path = normalize_path(&get_env_default(
            "MAINTENANCE_DISABLE_PATH",
            defaults.maintenance_disable_path,
        ));

        let redis_url = optional_env("REDIS_URL");
        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());
        let log_file = (!log_file.trim().is_empty()).then(|| PathBuf::from(log_file.trim()));

        Self {
            bind_addr,
            database_url,
            database_max_connections,
            cors_origin,
            admin_token,
            backup,
            maintenance_mode,
            maintenance_enable_path,
            maintenance_disable_path,
            redis_url,
            log_file,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Route paths must start with a slash.
fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
