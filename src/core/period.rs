//! Period handling: inclusive month ranges and date resolution.
//!
//! Record dates arrive as free text from the data-entry screens. They are
//! resolved to `(year, month)` here; anything unreadable resolves to `None`
//! and the aggregator skips the record.

use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar months inside one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub struct MonthRange {
    start: u32,
    end: u32,
}

#[derive(Serialize, Deserialize)]
struct RawRange {
    start: u32,
    end: u32,
}

impl TryFrom<RawRange> for MonthRange {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl From<MonthRange> for RawRange {
    fn from(range: MonthRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl MonthRange {
    /// Builds a range, rejecting anything outside `1 ≤ start ≤ end ≤ 12`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start < 1 || end > 12 || start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// January through December.
    #[must_use]
    pub const fn full_year() -> Self {
        Self { start: 1, end: 12 }
    }

    /// A single month. Months outside 1-12 are rejected.
    pub fn single(month: u32) -> Result<Self> {
        Self::new(month, month)
    }

    /// First month of the range.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last month of the range.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Whether `month` falls inside the range (both ends inclusive).
    #[must_use]
    pub const fn contains(&self, month: u32) -> bool {
        month >= self.start && month <= self.end
    }

    /// Months of the range in ascending order.
    pub fn months(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// Resolves a record date to `(year, month)`.
///
/// Accepts plain dates (`2024-03-15`), RFC 3339 timestamps
/// (`2024-03-15T09:30:00+09:00`) and naive timestamps (`2024-03-15 09:30:00`,
/// `2024-03-15T09:30:00`). Returns `None` for anything else.
#[must_use]
pub fn resolve_year_month(raw: &str) -> Option<(i32, u32)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some((date.year(), date.month()));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some((ts.year(), ts.month()));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| (ts.year(), ts.month()))
}

/// Converts a stored month column to a calendar month, dropping values outside 1-12.
#[must_use]
pub fn checked_month(month: i32) -> Option<u32> {
    u32::try_from(month).ok().filter(|m| (1..=12).contains(m))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_month_range_accepts_valid_bounds() {
        let range = MonthRange::new(3, 5).unwrap();
        assert_eq!(range.start(), 3);
        assert_eq!(range.end(), 5);
        assert_eq!(range.months().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_month_range_rejects_invalid_bounds() {
        assert!(matches!(
            MonthRange::new(0, 3),
            Err(Error::InvalidRange { start: 0, end: 3 })
        ));
        assert!(MonthRange::new(5, 13).is_err());
        assert!(MonthRange::new(6, 5).is_err());
        assert!(MonthRange::single(12).is_ok());
    }

    #[test]
    fn test_month_range_contains_is_inclusive() {
        let range = MonthRange::new(3, 5).unwrap();
        assert!(!range.contains(2));
        assert!(range.contains(3));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert!(MonthRange::full_year().contains(12));
    }

    #[test]
    fn test_month_range_deserialize_validates() {
        let ok: MonthRange = serde_json::from_str(r#"{"start":2,"end":4}"#).unwrap();
        assert_eq!(ok, MonthRange::new(2, 4).unwrap());

        let bad: std::result::Result<MonthRange, _> =
            serde_json::from_str(r#"{"start":4,"end":2}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_resolve_year_month_formats() {
        assert_eq!(resolve_year_month("2024-03-15"), Some((2024, 3)));
        assert_eq!(resolve_year_month(" 2024-12-01 "), Some((2024, 12)));
        assert_eq!(
            resolve_year_month("2024-03-31T23:30:00+09:00"),
            Some((2024, 3))
        );
        assert_eq!(resolve_year_month("2024-07-01 10:00:00"), Some((2024, 7)));
        assert_eq!(resolve_year_month("2024-07-01T10:00:00"), Some((2024, 7)));
    }

    #[test]
    fn test_resolve_year_month_rejects_garbage() {
        assert_eq!(resolve_year_month(""), None);
        assert_eq!(resolve_year_month("not a date"), None);
        assert_eq!(resolve_year_month("2024-13-01"), None);
    }

    #[test]
    fn test_checked_month() {
        assert_eq!(checked_month(1), Some(1));
        assert_eq!(checked_month(12), Some(12));
        assert_eq!(checked_month(0), None);
        assert_eq!(checked_month(13), None);
        assert_eq!(checked_month(-3), None);
    }
}
