//! Grouping keys derived from the date of an expense
//!
//! A week is an ISO week (Monday to Sunday, numbered within its ISO year,
//! so that early January can belong to week 52 or 53 of the previous year).
//! A month is a plain calendar month.
//!
//! Keys order chronologically, which is the order summaries are printed in.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;

/// Size of the buckets in a periodic summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Week,
    Month,
}

impl Granularity {
    /// Human-readable name, used as a title
    pub fn name(self) -> &'static str {
        match self {
            Granularity::Week => "Week",
            Granularity::Month => "Month",
        }
    }
}

/// A week or a month
///
/// `Week` and `Month` keys are never mixed in the same summary, so the
/// derived ordering between the two variants is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl Period {
    /// Bucket containing `date`
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Week => {
                let iso = date.iso_week();
                Period::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// Calendar month of `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self::of(date, Granularity::Month)
    }

    /// First day of the period
    pub fn start(self) -> Option<NaiveDate> {
        match self {
            Period::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Mon),
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Last day of the period
    pub fn end(self) -> Option<NaiveDate> {
        match self {
            Period::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Sun),
            Period::Month { year, month } => {
                let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
                NaiveDate::from_ymd_opt(y, m, 1).map(|next| next - Duration::days(1))
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        match self {
            Period::Week { .. } => Self::of(date, Granularity::Week) == self,
            Period::Month { .. } => Self::of(date, Granularity::Month) == self,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week { year, week } => write!(f, "{}-W{:02}", year, week),
            Period::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}
