//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, booking service, REST API, metrics and
//! graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::BookingService;
use crate::config::AppConfig;
use crate::domain::{AvailabilityEngine, RepositoryProvider};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::clock::SystemClock;
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. Calling it twice is harmless.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if let Err(e) = result {
        warn!("Tracing subscriber already installed: {}", e);
    }
}

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking server.
///
/// # Examples
///
/// ```rust,no_run
/// use table_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: std::net::SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Build the booking service from the availability config
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting table booking service...");

        let prometheus_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        info!("Database: {}", app_cfg.database.url);
        let db = init_database(&app_cfg.database).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let catalog = app_cfg.availability.catalog()?;
        info!(
            slots = ?catalog.labels().collect::<Vec<_>>(),
            window = ?app_cfg.availability.window,
            "Availability configured"
        );
        let booking = Arc::new(BookingService::new(
            repos.clone(),
            AvailabilityEngine::new(catalog),
            app_cfg.availability.window,
        ));

        let state = AppState {
            booking,
            repos: repos.clone(),
            clock: Arc::new(SystemClock),
            started_at: Arc::new(Instant::now()),
        };

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(state, prometheus_handle);

        let api_addr = app_cfg.server.addr();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the server to fully stop.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds after the
    /// signal fires before the API task is aborted.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => log_api_exit(result),
            _ = self.shutdown.wait() => {
                info!("⏳ Waiting up to {:?} for in-flight requests...", timeout);
                match tokio::time::timeout(timeout, &mut api_task).await {
                    Ok(result) => log_api_exit(result),
                    Err(_) => {
                        warn!("Shutdown timeout reached, aborting REST API server");
                        api_task.abort();
                    }
                }
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Table booking service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down table booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process, so a
/// restart within the same process reuses the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install Prometheus metrics recorder: {}", e);
                None
            }
        })
        .clone()
}

fn log_api_exit(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server task panicked: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeSlot;
    use crate::infrastructure::DatabaseConfig;

    fn test_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 1;
        config.database = DatabaseConfig::in_memory();
        ServerOptions {
            config,
            auto_migrate: true,
        }
    }

    #[tokio::test]
    async fn starts_and_shuts_down() {
        let handle = ServerHandle::start(test_options()).await.unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);

        handle.repos.ping().await.unwrap();
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn starts_with_configured_slot_catalog() {
        let mut opts = test_options();
        opts.config.availability.slots = vec![
            TimeSlot::new("18:00:00", "6:00 PM"),
            TimeSlot::new("19:30:00", "7:30 PM"),
        ];

        let handle = ServerHandle::start(opts).await.unwrap();
        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn rejects_invalid_slot_catalog() {
        let mut opts = test_options();
        opts.config.availability.slots = vec![
            TimeSlot::new("12:00:00", "12:00 PM"),
            TimeSlot::new("12:00:00", "Noon"),
        ];

        assert!(ServerHandle::start(opts).await.is_err());
    }
}
