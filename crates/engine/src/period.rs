//! Calendar periods used to bucket entries.

use core::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month. Orders chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::of)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of calendar days in the month (28..=31).
    pub fn days(self) -> u32 {
        self.last_day().day()
    }

    pub fn previous(self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map_or(self, Self::of)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive calendar-date range `[start, end]`.
///
/// An inverted range (`start > end`) matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days(), 28);
        assert_eq!(YearMonth::new(2024, 4).unwrap().days(), 30);
        assert_eq!(YearMonth::new(2024, 12).unwrap().days(), 31);
    }

    #[test]
    fn previous_wraps_year() {
        let january = YearMonth::new(2024, 1).unwrap();
        assert_eq!(january.previous(), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 0).is_none());
    }

    #[test]
    fn ordering_and_display() {
        let a = YearMonth::new(2023, 12).unwrap();
        let b = YearMonth::new(2024, 1).unwrap();
        assert!(a < b);
        assert_eq!(b.to_string(), "2024-01");
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));

        let inverted = DateRange::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(!inverted.contains(date(2024, 1, 15)));
    }
}
