//! State shared by the booking routes

use std::sync::Arc;

use crate::application::BookingService;
use crate::shared::clock::Clock;

#[derive(Clone)]
pub struct BookingState {
    pub booking: Arc<BookingService>,
    pub clock: Arc<dyn Clock>,
}
