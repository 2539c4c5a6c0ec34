//! Application configuration
//!
//! Read from a TOML file, by default `~/.config/table-booking/config.toml`.
//! Every section and key is optional:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! shutdown_timeout = 30
//!
//! [database]
//! url = "sqlite://./table_booking.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [availability]
//! window = { kind = "next_days", days = 14 }
//!
//! [[availability.slots]]
//! stored = "18:00:00"
//! label = "6:00 PM"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::availability::{AvailabilityError, SlotCatalog, TimeSlot, WindowPolicy};
use crate::infrastructure::database::DatabaseConfig;
use crate::shared::errors::InfraError;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "TABLE_BOOKING_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub availability: AvailabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub window: WindowPolicy,
    /// Empty means the built-in lunch slots
    pub slots: Vec<TimeSlot>,
}

impl AvailabilityConfig {
    pub fn catalog(&self) -> Result<SlotCatalog, AvailabilityError> {
        if self.slots.is_empty() {
            Ok(SlotCatalog::default())
        } else {
            SlotCatalog::new(self.slots.clone())
        }
    }
}

impl AppConfig {
    /// Load from `path`, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::parse(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, InfraError> {
        let config: Self = toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `DATABASE_URL` wins over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = url;
            }
        }
    }

    fn validate(&self) -> Result<(), InfraError> {
        self.availability
            .catalog()
            .map_err(|e| InfraError::Config(e.to_string()))?;
        if let WindowPolicy::NextDays { days: 0 } = self.availability.window {
            return Err(InfraError::Config(
                "availability.window.days must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// `$TABLE_BOOKING_CONFIG`, else `<config dir>/table-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("table-booking")
        .join("config.toml")
}
