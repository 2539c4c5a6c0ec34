//! Identity module: who is calling
//!
//! Authentication itself happens in front of this service. The caller's
//! identity arrives as an explicit `Caller` value and is passed into every
//! booking operation.

pub mod caller;

pub use caller::{Caller, CallerRole};
