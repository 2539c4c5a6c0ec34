use thiserror::Error;

use crate::shared::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("unknown time slot '{0}'")]
    UnknownTimeSlot(String),

    #[error("guest count must be at least 1, got {0}")]
    InvalidGuestCount(i32),

    #[error("availability window must cover at least one day")]
    EmptyWindow,

    #[error("date out of supported range")]
    DateOutOfRange,

    #[error("invalid time slot catalog: {0}")]
    InvalidCatalog(String),
}

impl From<AvailabilityError> for DomainError {
    fn from(err: AvailabilityError) -> Self {
        DomainError::Validation(err.to_string())
    }
}
