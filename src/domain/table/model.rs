//! Dining table domain entity

/// A bookable table. Capacity is fixed once the table is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Unique table ID
    pub id: i32,
    /// Maximum number of guests the table seats
    pub capacity: i32,
}

impl Table {
    pub fn new(id: i32, capacity: i32) -> Self {
        Self { id, capacity }
    }

    /// Whether a party of `guests` fits at this table
    pub fn seats(&self, guests: i32) -> bool {
        self.capacity >= guests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_up_to_capacity() {
        let table = Table::new(1, 4);
        assert!(table.seats(1));
        assert!(table.seats(4));
        assert!(!table.seats(5));
    }
}
