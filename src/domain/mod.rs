pub mod availability;
pub mod repositories;
pub mod reservation;
pub mod table;

pub use availability::{
    AvailabilityEngine, AvailabilityError, AvailabilitySlot, AvailabilityWindow, SlotCatalog,
    SlotTimes, TableAvailability, TimeSlot, WindowPolicy,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{NewReservation, Reservation, ReservationFilter, ReservationRepository};
pub use table::{Table, TableRepository};

pub use crate::shared::errors::DomainError;
