use chrono::NaiveDate;
use std::{fmt, iter, ops};

/// A monetary value, in the single currency the tracker knows about
///
/// Negative values are legal and stand for refunds or credits.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Amount(pub f64);

impl Amount {
    pub const ZERO: Self = Self(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl ops::Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl ops::Mul<f64> for Amount {
    type Output = Self;
    fn mul(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

/// One line of the expense log
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub description: String,
}

impl Expense {
    pub fn new<C, D>(date: NaiveDate, category: C, amount: f64, description: D) -> Self
    where
        C: ToString,
        D: ToString,
    {
        Self {
            date,
            category: category.to_string(),
            amount: Amount(amount),
            description: description.to_string(),
        }
    }
}
