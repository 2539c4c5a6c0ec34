//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to the per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::reservation::ReservationRepository;
use super::table::TableRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// This is the reservation store gateway: the booking service sources
/// availability inputs from it and reconciles writes against it.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let tables = repos.tables().list().await?;
///     let booked = repos.reservations().list(&ReservationFilter::default()).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn tables(&self) -> &dyn TableRepository;
    fn reservations(&self) -> &dyn ReservationRepository;

    /// Cheap round-trip to check the store is reachable
    async fn ping(&self) -> DomainResult<()>;
}
