//! Reservation aggregate

pub mod model;
pub mod repository;

pub use model::{NewReservation, Reservation, ReservationFilter};
pub use repository::ReservationRepository;
