//! Calendar dates, date spans, and reporting periods.
//!
//! All schedule dates are whole calendar days (`NaiveDate`). Day counts
//! are signed differences in calendar days; time of day is ignored.
//!
//! # Periods
//! A [`ReportInterval`] maps each day to a period label. Days sharing a
//! label belong to the same reporting bucket.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Signed number of calendar days from `from` to `to`.
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Shifts a date by a signed number of days, saturating at the calendar bounds.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Parses a loosely formatted date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, and timestamps whose first ten
/// characters are a `YYYY-MM-DD` date (e.g. RFC 3339).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    let head = if s.len() > 10 && s.is_char_boundary(10) {
        &s[..10]
    } else {
        s
    };
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%Y/%m/%d"))
        .ok()
}

/// An inclusive calendar span [start, end].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateSpan {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateSpan {
    /// Creates a span, swapping the bounds if they are reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Number of days covered, counting both ends.
    #[inline]
    pub fn day_count(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }

    /// Whether the day lies inside the span.
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Whether two spans share at least one day.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest span covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Iterates every day of the span in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.day_count()).map(move |offset| add_days(start, offset))
    }
}

/// Granularity of a reporting curve.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportInterval {
    /// One point per calendar day.
    #[default]
    Day,
    /// ISO weeks (Monday-based).
    Week,
    /// Calendar months.
    Month,
    /// Calendar quarters.
    Quarter,
}

impl ReportInterval {
    /// Label of the period containing `day`.
    ///
    /// | Interval | Label |
    /// |----------|-------|
    /// | Day | `2026-03-05` |
    /// | Week | `2026-W10` |
    /// | Month | `2026-03` |
    /// | Quarter | `Q1 2026` |
    pub fn period_label(&self, day: NaiveDate) -> String {
        match self {
            Self::Day => day.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = day.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => format!("{}-{:02}", day.year(), day.month()),
            Self::Quarter => format!("Q{} {}", (day.month() - 1) / 3 + 1, day.year()),
        }
    }
}
