//! Time-slot catalog and per-day slot maps

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::error::AvailabilityError;

/// One bookable time of day: the form kept in the store and the label
/// shown to guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub stored: String,
    pub label: String,
}

impl TimeSlot {
    pub fn new(stored: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            stored: stored.into(),
            label: label.into(),
        }
    }
}

/// Closed, ordered set of time slots offered every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            slots: vec![
                TimeSlot::new("12:00:00", "12:00 PM"),
                TimeSlot::new("13:00:00", "1:00 PM"),
                TimeSlot::new("14:00:00", "2:00 PM"),
                TimeSlot::new("15:00:00", "3:00 PM"),
            ],
        }
    }
}

impl SlotCatalog {
    pub fn new(slots: Vec<TimeSlot>) -> Result<Self, AvailabilityError> {
        if slots.is_empty() {
            return Err(AvailabilityError::InvalidCatalog(
                "at least one time slot is required".into(),
            ));
        }
        for (i, slot) in slots.iter().enumerate() {
            if slot.label.trim().is_empty() || slot.stored.trim().is_empty() {
                return Err(AvailabilityError::InvalidCatalog(
                    "time slot values must not be empty".into(),
                ));
            }
            // `resolve` accepts either form, so no value may name two slots
            for other in &slots[..i] {
                if other.stored == slot.stored
                    || other.label.eq_ignore_ascii_case(&slot.label)
                    || other.label.eq_ignore_ascii_case(&slot.stored)
                    || other.stored.eq_ignore_ascii_case(&slot.label)
                {
                    return Err(AvailabilityError::InvalidCatalog(format!(
                        "duplicate time slot '{}'",
                        slot.label
                    )));
                }
            }
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.label.as_str())
    }

    /// Map a raw stored value to its display label. Labels map to
    /// themselves; unrecognised values pass through unchanged.
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        let raw = raw.trim();
        self.slots
            .iter()
            .find(|s| s.stored == raw || s.label == raw)
            .map(|s| s.label.as_str())
            .unwrap_or(raw)
    }

    /// Look up a slot by label or stored value.
    pub fn resolve(&self, input: &str) -> Result<&TimeSlot, AvailabilityError> {
        let input = input.trim();
        self.slots
            .iter()
            .find(|s| s.stored == input || s.label.eq_ignore_ascii_case(input))
            .ok_or_else(|| AvailabilityError::UnknownTimeSlot(input.to_string()))
    }
}

/// Label → free flag for one day, kept in catalog order.
///
/// Serializes as a JSON object whose keys follow the catalog order, so
/// identical inputs always produce identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTimes {
    entries: Vec<(String, bool)>,
}

impl SlotTimes {
    /// Every catalog label, all free
    pub fn all_free(catalog: &SlotCatalog) -> Self {
        Self {
            entries: catalog.labels().map(|l| (l.to_string(), true)).collect(),
        }
    }

    /// Mark `label` as taken. Returns false when the label is not one of
    /// the day's slots; the map is left unchanged in that case.
    pub fn occupy(&mut self, label: &str) -> bool {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, free)) => {
                *free = false;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, label: &str) -> Option<bool> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, f)| *f)
    }

    pub fn is_free(&self, label: &str) -> bool {
        self.get(label).unwrap_or(false)
    }

    pub fn any_free(&self) -> bool {
        self.entries.iter().any(|(_, free)| *free)
    }

    pub fn free_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, free)| *free)
            .map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(l, f)| (l.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SlotTimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, free) in &self.entries {
            map.serialize_entry(label, free)?;
        }
        map.end()
    }
}
