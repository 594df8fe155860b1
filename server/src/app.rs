//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::StoreService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub store: Arc<StoreService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;

        match command {
            Some(Commands::Check) => app.check().await,
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let store = StoreService::init(&config.database)
            .await
            .with_context(|| format!("Failed to initialize {} store", config.database.store))?;
        let store = Arc::new(store);
        tracing::debug!(backend = %store.backend(), "Incident store initialized");

        let shutdown = ShutdownService::new(store.clone());

        Ok(Self {
            shutdown,
            config,
            store,
        })
    }

    /// Verify the incidents table is readable, print its row count and exit
    async fn check(self) -> Result<()> {
        let result = self.store.repository().ping().await;
        self.store.close().await;

        let rows = result.context("Incident store check failed")?;
        println!("{} store OK: {} incidents", self.store.backend(), rows);
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        let rows = match app.store.as_ref() {
            StoreService::Memory(m) => Some(m.len()),
            StoreService::Postgres(_) => None,
        };
        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.store.backend(),
            rows,
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(h) = self
            .store
            .start_health_check_task(self.shutdown.subscribe())
        {
            self.shutdown.register(h).await;
        }

        tracing::debug!("Background tasks started");
    }
}
