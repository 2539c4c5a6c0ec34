//! In-memory storage implementation

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationRepository,
};
use crate::domain::table::{Table, TableRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

type SlotKey = (i32, NaiveDate, String);

pub struct InMemoryTableRepository {
    tables: Arc<DashMap<i32, Table>>,
    counter: AtomicI32,
}

#[async_trait]
impl TableRepository for InMemoryTableRepository {
    async fn create(&self, capacity: i32) -> DomainResult<Table> {
        if capacity < 1 {
            return Err(DomainError::Validation(
                "capacity must be at least 1".into(),
            ));
        }
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let table = Table::new(id, capacity);
        self.tables.insert(id, table.clone());
        Ok(table)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Table>> {
        Ok(self.tables.get(&id).map(|t| t.clone()))
    }

    async fn list(&self) -> DomainResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.tables.iter().map(|t| t.value().clone()).collect();
        tables.sort_by_key(|t| t.id);
        Ok(tables)
    }
}

pub struct InMemoryReservationRepository {
    tables: Arc<DashMap<i32, Table>>,
    reservations: DashMap<i32, Reservation>,
    /// (table, date, slot) → reservation id; enforces one booking per slot
    booked: DashMap<SlotKey, i32>,
    counter: AtomicI32,
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        if !self.tables.contains_key(&new.table_id) {
            return Err(DomainError::Validation(format!(
                "Unknown reference: table {}",
                new.table_id
            )));
        }

        let key = (new.table_id, new.date, new.time_slot.clone());
        let id = match self.booked.entry(key) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "table {} is already reserved on {} at {}",
                    new.table_id, new.date, new.time_slot
                )))
            }
            Entry::Vacant(slot) => {
                let id = self.counter.fetch_add(1, Ordering::SeqCst);
                slot.insert(id);
                id
            }
        };

        let reservation = new.into_reservation(id);
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn list(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| (r.date, r.id));
        Ok(found)
    }

    async fn delete(&self, id: i32) -> DomainResult<Reservation> {
        let (_, reservation) = self
            .reservations
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))?;
        self.booked.remove(&(
            reservation.table_id,
            reservation.date,
            reservation.time_slot.clone(),
        ));
        Ok(reservation)
    }
}

/// In-memory repositories for development and testing
pub struct InMemoryRepositoryProvider {
    tables: InMemoryTableRepository,
    reservations: InMemoryReservationRepository,
    available: AtomicBool,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let tables = Arc::new(DashMap::new());
        Self {
            tables: InMemoryTableRepository {
                tables: tables.clone(),
                counter: AtomicI32::new(1),
            },
            reservations: InMemoryReservationRepository {
                tables,
                reservations: DashMap::new(),
                booked: DashMap::new(),
                counter: AtomicI32::new(1),
            },
            available: AtomicBool::new(true),
        }
    }

    /// Make `ping` fail, as if the store went away
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    async fn ping(&self) -> DomainResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::StoreUnavailable("in-memory store offline".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(table_id: i32, slot: &str) -> NewReservation {
        NewReservation {
            table_id,
            name: "Guest".into(),
            email: "guest@example.com".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_slot: slot.into(),
            guests: 2,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let repos = InMemoryRepositoryProvider::new();
        assert_eq!(repos.tables().create(2).await.unwrap().id, 1);
        assert_eq!(repos.tables().create(4).await.unwrap().id, 2);
        assert_eq!(repos.tables().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn same_slot_twice_conflicts_until_deleted() {
        let repos = InMemoryRepositoryProvider::new();
        let table = repos.tables().create(2).await.unwrap();

        let first = repos.reservations().create(booking(table.id, "12:00:00")).await.unwrap();
        let err = repos
            .reservations()
            .create(booking(table.id, "12:00:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        repos.reservations().delete(first.id).await.unwrap();
        repos.reservations().create(booking(table.id, "12:00:00")).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_table_is_rejected() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos.reservations().create(booking(9, "12:00:00")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos.reservations().delete(3).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn ping_reflects_availability() {
        let repos = InMemoryRepositoryProvider::new();
        assert!(repos.ping().await.is_ok());
        repos.set_available(false);
        assert!(repos.ping().await.unwrap_err().is_transient());
    }
}
