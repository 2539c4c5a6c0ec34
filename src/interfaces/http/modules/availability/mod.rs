//! Reverse availability lookups used by the booking form

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
