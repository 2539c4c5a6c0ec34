//! Availability derivation
//!
//! Pure functions turning tables and reservations into a per-table,
//! per-date, per-time-slot availability grid, and the reverse queries
//! used when booking. Nothing here performs I/O or reads a clock; "today"
//! is always passed in.

pub mod engine;
pub mod error;
pub mod slots;
pub mod window;

pub use engine::{AvailabilityEngine, AvailabilitySlot, TableAvailability};
pub use error::AvailabilityError;
pub use slots::{SlotCatalog, SlotTimes, TimeSlot};
pub use window::{AvailabilityWindow, WindowPolicy};
