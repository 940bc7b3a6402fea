//! Application context - dependency injection container

use std::sync::Arc;

use quickstart_core::{
    FilePicker, LifecycleCoordinator, ProcessInspector, ProcessLauncher, WorkspaceRepository,
    WorkspaceService,
};
use quickstart_domain::{Config, Result};
use quickstart_infra::{
    DbManager, DefaultHandlerLauncher, PromptFilePicker, SqliteWorkspaceRepository,
    SysinfoProcessInspector,
};
use tracing::debug;

/// Type alias for the workspace store port trait object
pub type DynWorkspaceRepository = dyn WorkspaceRepository + 'static;

/// Type alias for the file picker port trait object
pub type DynFilePicker = dyn FilePicker + Send + Sync + 'static;

/// Everything a command needs, wired once per invocation.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub repository: Arc<DynWorkspaceRepository>,
    pub workspaces: WorkspaceService,
    pub lifecycle: LifecycleCoordinator,
    pub picker: Arc<DynFilePicker>,
}

impl AppContext {
    /// Open the configured database and wire the platform adapters.
    pub fn new(config: Config) -> Result<Self> {
        let launcher = Arc::new(DefaultHandlerLauncher::from_config(&config.launcher));
        let inspector = Arc::new(SysinfoProcessInspector::new());
        let picker = Arc::new(PromptFilePicker::new());

        Self::with_ports(config, launcher, inspector, picker)
    }

    /// Wire the context around caller-supplied OS ports. The store is always
    /// the SQLite database named by `config`, migrated and health-checked before any
    /// command runs.
    pub fn with_ports(
        config: Config,
        launcher: Arc<dyn ProcessLauncher>,
        inspector: Arc<dyn ProcessInspector>,
        picker: Arc<DynFilePicker>,
    ) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;
        db.health_check()?;

        let repository: Arc<DynWorkspaceRepository> =
            Arc::new(SqliteWorkspaceRepository::new(Arc::clone(&db)));
        let workspaces = WorkspaceService::new(Arc::clone(&repository));
        let lifecycle = LifecycleCoordinator::new(Arc::clone(&repository), launcher, inspector)
            .with_accounting(config.usage.accounting);

        debug!(
            db_path = %db.path().display(),
            accounting = %config.usage.accounting,
            "app context initialised"
        );

        Ok(Self { config, db, repository, workspaces, lifecycle, picker })
    }
}
