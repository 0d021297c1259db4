//! Monthly overspending alert
//!
//! The month under scrutiny is the one containing the date the check is run,
//! regardless of which months actually have expenses.

use chrono::NaiveDate;
use std::fmt;

use crate::lib::{entry::Amount, period::Period, summary::Aggregator};

/// Fraction of the threshold above which a warning is emitted
pub const WARNING_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    threshold: Amount,
}

/// Outcome of a budget check for one month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Check {
    pub month: Period,
    pub total: Amount,
    pub status: Status,
}

impl Budget {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: Amount(threshold),
        }
    }

    /// Classify a monthly total
    pub fn status(&self, total: Amount) -> Status {
        if total > self.threshold {
            Status::Exceeded
        } else if total > self.threshold * WARNING_RATIO {
            Status::Warning
        } else {
            Status::Ok
        }
    }

    /// Check the month containing `today`
    pub fn check(&self, agg: &Aggregator, today: NaiveDate) -> Check {
        let month = Period::month_of(today);
        let total = agg.period_total(month);
        Check {
            month,
            total,
            status: self.status(total),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total spent this month ({}): ${}", self.month, self.total)?;
        match self.status {
            Status::Exceeded => writeln!(f, "ALERT: You've exceeded your monthly budget!"),
            Status::Warning => {
                writeln!(f, "Warning: You're close to reaching your monthly budget.")
            }
            Status::Ok => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::entry::Expense;

    macro_rules! status {
        ( $total:expr => $st:ident ) => {{
            assert_eq!(Budget::new(20000.0).status(Amount($total)), Status::$st);
        }}
    }

    #[test]
    fn thresholds() {
        status!(1000.0 => Ok);
        status!(18500.0 => Warning);
        status!(20500.0 => Exceeded);
        status!(18000.0 => Ok);
        status!(20000.0 => Warning);
        status!(20000.01 => Exceeded);
        status!(0.0 => Ok);
        status!(-50.0 => Ok);
    }

    #[test]
    fn current_month_uses_today() {
        let recs = vec![
            Expense::new(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(), "Rent", 25000.0, ""),
            Expense::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), "Food", 100.0, ""),
        ];
        let agg = Aggregator::new(&recs).unwrap();
        let budget = Budget::new(20000.0);

        let april = budget.check(&agg, NaiveDate::from_ymd_opt(2024, 4, 28).unwrap());
        assert_eq!(april.total, Amount(25000.0));
        assert_eq!(april.status, Status::Exceeded);

        let may = budget.check(&agg, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        assert_eq!(may.total, Amount(100.0));
        assert_eq!(may.status, Status::Ok);

        // an empty current month is fine even when past months overspent
        let june = budget.check(&agg, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(june.total, Amount::ZERO);
        assert_eq!(june.status, Status::Ok);
        assert_eq!(&format!("{}", june), "Total spent this month (2024-06): $0.00\n");
    }

    #[test]
    fn check_fmt() {
        let check = Check {
            month: Period::month_of(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            total: Amount(18500.0),
            status: Status::Warning,
        };
        let text = format!("{}", check);
        assert!(text.starts_with("Total spent this month (2024-05): $18500.00\n"));
        assert!(text.contains("close to reaching"));
    }
}
