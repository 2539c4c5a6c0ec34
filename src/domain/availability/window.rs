//! Date windows over which availability is computed

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::AvailabilityError;

/// Contiguous run of calendar dates: `start` inclusive, `days` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    start: NaiveDate,
    days: u32,
}

impl AvailabilityWindow {
    pub fn new(start: NaiveDate, days: u32) -> Result<Self, AvailabilityError> {
        if days == 0 {
            return Err(AvailabilityError::EmptyWindow);
        }
        start
            .checked_add_days(Days::new(u64::from(days - 1)))
            .ok_or(AvailabilityError::DateOutOfRange)?;
        Ok(Self { start, days })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            days: 1,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn last_day(&self) -> NaiveDate {
        // range checked in `new`
        self.start
            .checked_add_days(Days::new(u64::from(self.days - 1)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.last_day()
    }

    /// Every date in the window, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.days as usize)
    }
}

/// How the listing window is derived from "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// The whole calendar month after the one containing today
    #[default]
    NextCalendarMonth,
    /// Today inclusive, for the given number of days
    NextDays { days: u32 },
}

impl WindowPolicy {
    pub fn resolve(&self, today: NaiveDate) -> Result<AvailabilityWindow, AvailabilityError> {
        match *self {
            WindowPolicy::NextCalendarMonth => {
                let start = today
                    .with_day(1)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .ok_or(AvailabilityError::DateOutOfRange)?;
                let end = start
                    .checked_add_months(Months::new(1))
                    .ok_or(AvailabilityError::DateOutOfRange)?;
                let days = u32::try_from((end - start).num_days())
                    .map_err(|_| AvailabilityError::DateOutOfRange)?;
                AvailabilityWindow::new(start, days)
            }
            WindowPolicy::NextDays { days } => AvailabilityWindow::new(today, days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn next_calendar_month_covers_whole_month() {
        let w = WindowPolicy::NextCalendarMonth.resolve(d(2024, 1, 20)).unwrap();
        assert_eq!(w.start(), d(2024, 2, 1));
        assert_eq!(w.days(), 29);
        assert_eq!(w.last_day(), d(2024, 2, 29));
    }

    #[test]
    fn next_calendar_month_rolls_over_year() {
        let w = WindowPolicy::NextCalendarMonth.resolve(d(2024, 12, 31)).unwrap();
        assert_eq!(w.start(), d(2025, 1, 1));
        assert_eq!(w.days(), 31);
    }

    #[test]
    fn next_days_starts_today() {
        let w = WindowPolicy::NextDays { days: 14 }.resolve(d(2024, 6, 10)).unwrap();
        assert_eq!(w.start(), d(2024, 6, 10));
        assert_eq!(w.last_day(), d(2024, 6, 23));
        assert!(w.contains(d(2024, 6, 23)));
        assert!(!w.contains(d(2024, 6, 24)));
        assert!(!w.contains(d(2024, 6, 9)));
    }

    #[test]
    fn zero_days_is_rejected() {
        assert_eq!(
            WindowPolicy::NextDays { days: 0 }.resolve(d(2024, 6, 10)),
            Err(AvailabilityError::EmptyWindow)
        );
    }

    #[test]
    fn dates_have_no_gaps_or_duplicates() {
        let w = AvailabilityWindow::new(d(2024, 2, 27), 4).unwrap();
        let dates: Vec<_> = w.dates().collect();
        assert_eq!(dates, vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }

    #[test]
    fn policy_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Wrap {
            window: WindowPolicy,
        }
        let w: Wrap = toml::from_str("window = { kind = \"next_days\", days = 14 }").unwrap();
        assert_eq!(w.window, WindowPolicy::NextDays { days: 14 });
        let w: Wrap = toml::from_str("window = { kind = \"next_calendar_month\" }").unwrap();
        assert_eq!(w.window, WindowPolicy::NextCalendarMonth);
    }
}
