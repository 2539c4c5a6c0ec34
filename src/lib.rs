//! # Table Booking
//!
//! Restaurant table reservations: an availability engine over dining tables
//! and their bookings, a persistent reservation store and a REST API.
//!
//! ## Architecture
//!
//! - **domain**: tables, reservations, the availability engine and repository traits
//! - **application**: caller identity and the booking use cases
//! - **infrastructure**: SeaORM database and in-memory storage
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, retry, clock and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiDoc, AppState};

pub use server::{ServerHandle, ServerOptions};
