//! Table booking service
//!
//! Reads configuration from a TOML file (`$TABLE_BOOKING_CONFIG`, or
//! ~/.config/table-booking/config.toml) and serves the REST API.

use tracing::{error, info};

use table_booking::config::{default_config_path, AppConfig};
use table_booking::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = default_config_path();

    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            cfg.apply_env_overrides();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = match ServerHandle::start(ServerOptions {
        config: app_cfg,
        auto_migrate: true,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    handle.wait().await;

    Ok(())
}
