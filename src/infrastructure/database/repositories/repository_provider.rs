//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::domain::repositories::{DomainResult, RepositoryProvider};
use crate::domain::reservation::ReservationRepository;
use crate::domain::table::TableRepository;

use super::reservation_repository::SeaOrmReservationRepository;
use super::table_repository::SeaOrmTableRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let tables = repos.tables().list().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    tables: SeaOrmTableRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tables: SeaOrmTableRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_owned(),
            ))
            .await?;
        Ok(())
    }
}
