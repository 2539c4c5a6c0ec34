//! Reservation DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Reservation, SlotCatalog};

/// Request to book a table
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Table to book. When omitted the first free table that fits is assigned
    pub table_id: Option<i32>,
    /// Guest name
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Contact email
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Reservation date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Time label ("1:00 PM") or 24-hour value ("13:00:00")
    #[validate(length(min = 1, message = "time_slot is required"))]
    pub time_slot: String,
    /// Party size
    #[validate(range(min = 1, max = 100, message = "guests must be between 1 and 100"))]
    pub guests: i32,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub table_id: i32,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    /// Display label, e.g. "1:00 PM"
    pub time_slot: String,
    /// Stored 24-hour value, e.g. "13:00:00"
    pub time_value: String,
    pub guests: i32,
}

impl ReservationDto {
    pub fn from_domain(r: Reservation, catalog: &SlotCatalog) -> Self {
        Self {
            time_slot: catalog.normalize(&r.time_slot).to_string(),
            id: r.id,
            table_id: r.table_id,
            name: r.name,
            email: r.email,
            date: r.date,
            time_value: r.time_slot,
            guests: r.guests,
        }
    }
}

/// Filters for listing reservations
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationQuery {
    /// Only this table
    pub table_id: Option<i32>,
    /// Only reservations made under this email (ignored for customers)
    pub email: Option<String>,
    /// First date to include
    pub from: Option<NaiveDate>,
    /// Number of days from `from` (default 1 when `from` is given)
    #[validate(range(min = 1, max = 366))]
    pub days: Option<u32>,
}

/// Legacy `DELETE /reservations?id=` form
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteReservationQuery {
    pub id: Option<String>,
}
