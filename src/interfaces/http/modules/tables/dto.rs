//! Table DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{AvailabilitySlot, SlotTimes, Table, TableAvailability};

/// Request to add a table
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    /// Number of seats
    #[validate(range(min = 1, max = 100, message = "capacity must be between 1 and 100"))]
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableDto {
    pub id: i32,
    pub capacity: i32,
}

impl From<Table> for TableDto {
    fn from(t: Table) -> Self {
        Self {
            id: t.id,
            capacity: t.capacity,
        }
    }
}

/// One day of a table's availability
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilitySlotDto {
    pub date: NaiveDate,
    /// Time label → `true` when free, in serving order
    #[schema(value_type = Object, example = json!({"12:00 PM": true, "1:00 PM": false, "2:00 PM": true, "3:00 PM": true}))]
    pub times: SlotTimes,
}

impl From<AvailabilitySlot> for AvailabilitySlotDto {
    fn from(s: AvailabilitySlot) -> Self {
        Self {
            date: s.date,
            times: s.times,
        }
    }
}

/// A table with its availability over the listing window
#[derive(Debug, Serialize, ToSchema)]
pub struct TableAvailabilityDto {
    pub id: i32,
    pub capacity: i32,
    pub availability: Vec<AvailabilitySlotDto>,
}

impl From<TableAvailability> for TableAvailabilityDto {
    fn from(ta: TableAvailability) -> Self {
        Self {
            id: ta.table.id,
            capacity: ta.table.capacity,
            availability: ta.availability.into_iter().map(Into::into).collect(),
        }
    }
}
