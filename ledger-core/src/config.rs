//! Service configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/ledger | Working directory (database, logs) |
//! | DATABASE_PATH | <WORK_DIR>/ledger.db | SQLite database file |
//! | LOG_LEVEL | info | Tracing level filter |
//! | LOG_DIR | (unset) | Daily-rolling log file directory |
//! | EXPIRY_WINDOW_DAYS | 7 | Default window for expiring-soon queries |

#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub expiry_window_days: i64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ledger".to_string());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{work_dir}/ledger.db"));

        Self {
            database_path,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: std::env::var("LOG_DIR").ok(),
            expiry_window_days: std::env::var("EXPIRY_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            work_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
