//! Reservation domain entity

use chrono::NaiveDate;

use crate::domain::availability::AvailabilityWindow;

/// A booked table for one time slot on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: i32,
    /// Reserved table
    pub table_id: i32,
    /// Guest name
    pub name: String,
    /// Contact email, also identifies the customer who booked
    pub email: String,
    /// Reservation date
    pub date: NaiveDate,
    /// Time slot in stored 24-hour form (e.g. "13:00:00")
    pub time_slot: String,
    /// Party size
    pub guests: i32,
}

/// Data for a reservation that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub table_id: i32,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub guests: i32,
}

impl NewReservation {
    pub fn into_reservation(self, id: i32) -> Reservation {
        Reservation {
            id,
            table_id: self.table_id,
            name: self.name,
            email: self.email,
            date: self.date,
            time_slot: self.time_slot,
            guests: self.guests,
        }
    }
}

/// Optional constraints when listing reservations. An empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub table_id: Option<i32>,
    pub window: Option<AvailabilityWindow>,
    pub email: Option<String>,
}

impl ReservationFilter {
    pub fn for_window(window: AvailabilityWindow) -> Self {
        Self {
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(table_id) = self.table_id {
            if reservation.table_id != table_id {
                return false;
            }
        }
        if let Some(window) = &self.window {
            if !window.contains(reservation.date) {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !reservation.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        true
    }
}
