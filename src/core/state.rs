use crate::audit::AuditRecorder;
use crate::catalog::CategoryService;
use crate::core::Config;
use crate::db::DbService;

/// Server state shared by every handler
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | SQLite connection pool wrapper |
/// | categories | category lifecycle service |
/// | audit | audit log reader/writer |
///
/// Cloning is shallow; the services share one pool.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub categories: CategoryService,
    pub audit: AuditRecorder,
}

impl ServerState {
    /// Open the database, run migrations, and wire up the services.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = DbService::new(&config.db_path).await?;
        let categories = CategoryService::new(db.pool.clone());
        let audit = AuditRecorder::new(db.pool.clone());

        tracing::info!(db_path = %config.db_path, "server state initialized");

        Ok(Self {
            config: config.clone(),
            db,
            categories,
            audit,
        })
    }
}
