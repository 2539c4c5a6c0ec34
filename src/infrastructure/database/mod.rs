pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Deserialize;
use tracing::info;

const DEFAULT_URL: &str = "sqlite://./table_booking.db?mode=rwc";

/// sqlx schedules its reaper at `now + lifetime`, so this has to stay finite.
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./table_booking.db?mode=rwc")
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a connection before giving up
    pub connect_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_connections: 10,
            connect_timeout: 5,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }

    /// Private in-memory SQLite database, gone when the pool closes
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections.max(1))
            .connect_timeout(Duration::from_secs(self.connect_timeout))
            .sqlx_logging(false);

        // every pooled connection to an in-memory SQLite URL is its own
        // database, so the single connection must never be recycled
        if self.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(IN_MEMORY_CONNECTION_LIFETIME)
                .max_lifetime(IN_MEMORY_CONNECTION_LIFETIME);
        }
        options
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let db = Database::connect(config.connect_options()).await?;
    info!("Database connected successfully");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_connection_is_pinned() {
        let options = DatabaseConfig::in_memory().connect_options();
        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_min_connections(), Some(1));
        assert_eq!(options.get_idle_timeout(), Some(IN_MEMORY_CONNECTION_LIFETIME));
        assert_eq!(options.get_max_lifetime(), Some(IN_MEMORY_CONNECTION_LIFETIME));
    }

    #[test]
    fn file_database_keeps_pool_defaults() {
        let options = DatabaseConfig::sqlite("./bookings.db").connect_options();
        assert_eq!(options.get_max_connections(), Some(10));
        assert_eq!(options.get_min_connections(), None);
        assert_eq!(options.get_max_lifetime(), None);
        assert_eq!(options.get_url(), "sqlite://./bookings.db?mode=rwc");
    }
}
