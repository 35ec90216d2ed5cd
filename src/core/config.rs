/// Server configuration
///
/// Every field can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | catalog.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | LOG_LEVEL | info | tracing filter level |
/// | LOG_DIR | logs | daily-rotated log directory |
/// | ENVIRONMENT | development | development \| staging \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub db_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// tracing filter level
    pub log_level: String,
    /// Directory for rotated log files
    pub log_dir: String,
    /// Runtime environment name
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above.
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "catalog.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
