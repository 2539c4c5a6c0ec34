//! Table repository interface

use async_trait::async_trait;

use super::model::Table;
use crate::domain::DomainResult;

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Create a table with the given capacity, returning it with its new ID
    async fn create(&self, capacity: i32) -> DomainResult<Table>;

    /// Find table by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Table>>;

    /// All tables ordered by ID
    async fn list(&self) -> DomainResult<Vec<Table>>;
}
