use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::error::AvailabilityError;
use super::slots::{SlotCatalog, SlotTimes};
use super::window::AvailabilityWindow;
use crate::domain::reservation::Reservation;
use crate::domain::table::Table;

/// Free/taken flags for one table on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    pub times: SlotTimes,
}

/// A table joined with its slots over a window, ordered by date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAvailability {
    pub table: Table,
    pub availability: Vec<AvailabilitySlot>,
}

impl TableAvailability {
    pub fn on(&self, date: NaiveDate) -> Option<&AvailabilitySlot> {
        self.availability
            .binary_search_by_key(&date, |slot| slot.date)
            .ok()
            .map(|i| &self.availability[i])
    }
}

/// Derives availability from tables and reservations for a fixed slot catalog.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityEngine {
    catalog: SlotCatalog,
}

impl AvailabilityEngine {
    pub fn new(catalog: SlotCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Per-table availability over `window`.
    ///
    /// Tables keep their input order; a repeated table id is only
    /// reported once. Reservations for other tables or outside the window
    /// are ignored.
    pub fn compute_availability(
        &self,
        tables: &[Table],
        reservations: &[Reservation],
        window: &AvailabilityWindow,
    ) -> Vec<TableAvailability> {
        let mut seen = HashSet::with_capacity(tables.len());

        tables
            .iter()
            .filter(|table| seen.insert(table.id))
            .map(|table| {
                let mut availability: Vec<AvailabilitySlot> = window
                    .dates()
                    .map(|date| AvailabilitySlot {
                        date,
                        times: SlotTimes::all_free(&self.catalog),
                    })
                    .collect();

                for reservation in reservations
                    .iter()
                    .filter(|r| r.table_id == table.id && window.contains(r.date))
                {
                    let offset = (reservation.date - window.start()).num_days() as usize;
                    let label = self.catalog.normalize(&reservation.time_slot);
                    if !availability[offset].times.occupy(label) {
                        debug!(
                            reservation_id = reservation.id,
                            time_slot = %reservation.time_slot,
                            "Reservation time slot not in catalog, ignored"
                        );
                    }
                }

                TableAvailability {
                    table: table.clone(),
                    availability,
                }
            })
            .collect()
    }

    /// Tables that seat `guests` and are free at `time` on `date`, in
    /// input order. `time` may be a label or a stored value.
    pub fn find_available_tables(
        &self,
        tables: &[Table],
        reservations: &[Reservation],
        guests: i32,
        date: NaiveDate,
        time: &str,
    ) -> Result<Vec<Table>, AvailabilityError> {
        check_guests(guests)?;
        let label = self.catalog.resolve(time)?.label.as_str();

        let candidates: Vec<Table> = tables.iter().filter(|t| t.seats(guests)).cloned().collect();
        let window = AvailabilityWindow::single_day(date);

        Ok(self
            .compute_availability(&candidates, reservations, &window)
            .into_iter()
            .filter(|ta| ta.availability.iter().any(|slot| slot.times.is_free(label)))
            .map(|ta| ta.table)
            .collect())
    }

    /// First free table in input order, used for auto-assignment.
    pub fn first_available_table(
        &self,
        tables: &[Table],
        reservations: &[Reservation],
        guests: i32,
        date: NaiveDate,
        time: &str,
    ) -> Result<Option<Table>, AvailabilityError> {
        Ok(self
            .find_available_tables(tables, reservations, guests, date, time)?
            .into_iter()
            .next())
    }

    /// Dates on or after `today` with at least one free slot at a table
    /// seating `guests`. Ascending, no duplicates.
    pub fn available_dates(
        &self,
        availability: &[TableAvailability],
        guests: i32,
        today: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AvailabilityError> {
        check_guests(guests)?;

        let mut dates: Vec<NaiveDate> = availability
            .iter()
            .filter(|ta| ta.table.seats(guests))
            .flat_map(|ta| ta.availability.iter())
            .filter(|slot| slot.date >= today && slot.times.any_free())
            .map(|slot| slot.date)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }

    /// Labels free on `date` at one or more tables seating `guests`, in
    /// catalog order.
    pub fn available_times(
        &self,
        availability: &[TableAvailability],
        guests: i32,
        date: NaiveDate,
    ) -> Result<Vec<String>, AvailabilityError> {
        check_guests(guests)?;

        let days: Vec<&AvailabilitySlot> = availability
            .iter()
            .filter(|ta| ta.table.seats(guests))
            .filter_map(|ta| ta.on(date))
            .collect();

        Ok(self
            .catalog
            .labels()
            .filter(|label| days.iter().any(|slot| slot.times.is_free(label)))
            .map(str::to_string)
            .collect())
    }
}

fn check_guests(guests: i32) -> Result<(), AvailabilityError> {
    if guests < 1 {
        return Err(AvailabilityError::InvalidGuestCount(guests));
    }
    Ok(())
}
