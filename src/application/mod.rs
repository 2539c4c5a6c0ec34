pub mod identity;
pub mod services;

// Re-export key types for convenience
pub use identity::{Caller, CallerRole};
pub use services::{BookingRequest, BookingService};
