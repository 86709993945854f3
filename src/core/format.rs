//! Display helpers for amounts and periods.
//!
//! Amounts are whole won; fractional parts are rounded away for display.

use crate::core::period::MonthRange;

/// Formats an amount as won with thousands separators, e.g. `1,234,500원`.
#[must_use]
pub fn format_won(amount: f64) -> String {
    if !amount.is_finite() {
        return "0원".to_string();
    }

    // `as` saturates outside the i64 range
    #[allow(clippy::cast_possible_truncation)]
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{grouped}원")
    } else {
        format!("{grouped}원")
    }
}

/// Formats a month range, e.g. `3월` or `3월 ~ 5월`.
#[must_use]
pub fn format_month_range(range: MonthRange) -> String {
    if range.start() == range.end() {
        format!("{}월", range.start())
    } else {
        format!("{}월 ~ {}월", range.start(), range.end())
    }
}

/// Formats a year and range, e.g. `2024년 3월 ~ 5월`.
#[must_use]
pub fn format_period(year: i32, range: MonthRange) -> String {
    format!("{year}년 {}", format_month_range(range))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0.0), "0원");
        assert_eq!(format_won(999.0), "999원");
        assert_eq!(format_won(1000.0), "1,000원");
        assert_eq!(format_won(1_234_567.0), "1,234,567원");
        assert_eq!(format_won(-45_000.0), "-45,000원");
        assert_eq!(format_won(1499.6), "1,500원");
        assert_eq!(format_won(f64::NAN), "0원");
    }

    #[test]
    fn test_format_month_range() {
        assert_eq!(format_month_range(MonthRange::single(3).unwrap()), "3월");
        assert_eq!(
            format_month_range(MonthRange::new(3, 5).unwrap()),
            "3월 ~ 5월"
        );
        assert_eq!(
            format_period(2024, MonthRange::full_year()),
            "2024년 1월 ~ 12월"
        );
    }
}
