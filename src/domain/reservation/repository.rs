//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Store a new reservation.
    ///
    /// Fails with `Conflict` when the table is already booked for the same
    /// date and time slot, and with `Validation` when the table does not exist.
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Reservations matching the filter, ordered by date then ID
    async fn list(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>>;

    /// Delete a reservation, returning the removed row
    async fn delete(&self, id: i32) -> DomainResult<Reservation>;
}
