//! Calendar windows used by dashboards, reports, and payment status.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors raised when building windows or months.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// `start` is after `end`.
    #[error("window start {start} is after end {end}")]
    Inverted {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
    /// Month string is not `YYYY-MM` or names an impossible month.
    #[error("month must be formatted as YYYY-MM, got `{0}`")]
    InvalidMonth(String),
}

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window, rejecting inverted ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        Month::containing(today).window()
    }

    /// First day, inclusive.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day, inclusive.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// True when `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Months touched by the window, oldest first.
    #[must_use]
    pub fn months(&self) -> Vec<Month> {
        let mut months = Vec::new();
        let mut cursor = Month::containing(self.start);
        let last = Month::containing(self.end);
        while cursor <= last {
            months.push(cursor);
            match cursor.next() {
                Some(next) => cursor = next,
                None => break,
            }
        }
        months
    }

    /// Number of calendar months the window touches, computed without
    /// walking them.
    #[must_use]
    pub fn month_span(&self) -> u64 {
        let first = Month::containing(self.start);
        let last = Month::containing(self.end);
        let years = i64::from(last.year) - i64::from(first.year);
        let months = years * 12 + i64::from(last.month) - i64::from(first.month);
        u64::try_from(months).map_or(0, |span| span + 1)
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Construct from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self, WindowError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| WindowError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .and_then(|next| next.first_day().pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The day rent falls due, clamped to the month's length.
    #[must_use]
    pub fn due_date(&self, due_day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, due_day.max(1))
            .unwrap_or_else(|| self.last_day())
    }

    /// Whole-month window.
    #[must_use]
    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    /// The following month, or `None` past the last representable one.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::containing)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WindowError::InvalidMonth(s.to_owned());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn rejects_inverted_window() {
        let err = DateWindow::new(date(2024, 5, 2), date(2024, 5, 1)).expect_err("inverted");
        assert!(matches!(err, WindowError::Inverted { .. }));
    }

    #[test]
    fn current_month_covers_whole_month() {
        let window = DateWindow::current_month(date(2024, 2, 14));
        assert_eq!(window.start(), date(2024, 2, 1));
        assert_eq!(window.end(), date(2024, 2, 29));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn months_span_year_boundary() {
        let window = DateWindow::new(date(2023, 11, 20), date(2024, 1, 3)).expect("window");
        let labels: Vec<String> = window.months().iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["2023-11", "2023-12", "2024-01"]);
    }

    #[rstest]
    #[case("2024-07", 2024, 7)]
    #[case(" 1999-12 ", 1999, 12)]
    fn parses_months(#[case] raw: &str, #[case] year: i32, #[case] month: u32) {
        let parsed: Month = raw.parse().expect("month");
        assert_eq!(parsed, Month::new(year, month).expect("month"));
    }

    #[rstest]
    #[case("2024-13")]
    #[case("2024-7")]
    #[case("July")]
    #[case("2024-00")]
    fn rejects_bad_months(#[case] raw: &str) {
        assert!(raw.parse::<Month>().is_err());
    }

    #[test]
    fn months_stop_at_the_last_representable_month() {
        let last = Month::containing(NaiveDate::MAX);
        assert_eq!(last.next(), None);
        assert_eq!(last.last_day(), NaiveDate::MAX);

        let start = last.first_day().pred_opt().expect("previous month");
        let window = DateWindow::new(start, NaiveDate::MAX).expect("window");
        assert_eq!(window.months().len(), 2);
        assert_eq!(window.month_span(), 2);
    }

    #[rstest]
    #[case(date(2024, 6, 3), date(2024, 6, 28), 1)]
    #[case(date(2023, 11, 20), date(2024, 1, 3), 3)]
    #[case(date(2020, 1, 1), date(2029, 12, 31), 120)]
    fn month_span_counts_touched_months(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] expected: u64,
    ) {
        let window = DateWindow::new(start, end).expect("window");
        assert_eq!(window.month_span(), expected);
        assert_eq!(u64::try_from(window.months().len()).expect("fits"), expected);
    }

    #[test]
    fn due_date_clamps_to_month_length() {
        let feb = Month::new(2023, 2).expect("month");
        assert_eq!(feb.due_date(5), date(2023, 2, 5));
        assert_eq!(feb.due_date(31), date(2023, 2, 28));
    }
}
