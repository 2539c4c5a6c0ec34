//! Application services

pub mod booking;

pub use booking::{BookingRequest, BookingService};
