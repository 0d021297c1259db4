use std::collections::BTreeMap;
use std::fmt;

use crate::lib::{
    entry::{Amount, Expense},
    period::{Granularity, Period},
};

/// Returned instead of an aggregation when there is nothing to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no expenses recorded")
    }
}

impl std::error::Error for NoData {}

/// Sums grouped by key, iterated in ascending key order
#[derive(Debug, Clone, PartialEq)]
pub struct Totals<K: Ord> {
    items: BTreeMap<K, Amount>,
}

impl<K: Ord> Totals<K> {
    fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    fn add(&mut self, key: K, amount: Amount) {
        *self.items.entry(key).or_insert(Amount::ZERO) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Amount)> {
        self.items.iter().map(|(k, a)| (k, *a))
    }
}

#[cfg(test)]
impl<K: Ord> Totals<K> {
    pub fn get(&self, key: &K) -> Option<Amount> {
        self.items.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn total(&self) -> Amount {
        self.items.values().copied().sum()
    }
}

/// Aggregations over a nonempty set of expenses
///
/// An `Aggregator` cannot be built from zero records, which forces every
/// report to handle the "nothing recorded yet" case before computing anything.
#[derive(Debug)]
pub struct Aggregator<'r> {
    records: &'r [Expense],
}

impl<'r> Aggregator<'r> {
    pub fn new(records: &'r [Expense]) -> Result<Self, NoData> {
        if records.is_empty() {
            Err(NoData)
        } else {
            Ok(Self { records })
        }
    }

    /// Sum of amounts per category, in lexical order of the category
    pub fn sum_by_category(&self) -> Totals<String> {
        let mut totals = Totals::new();
        for rec in self.records {
            totals.add(rec.category.clone(), rec.amount);
        }
        totals
    }

    /// Sum of amounts per week or per month, in chronological order
    pub fn sum_by_period(&self, granularity: Granularity) -> Totals<Period> {
        let mut totals = Totals::new();
        for rec in self.records {
            totals.add(Period::of(rec.date, granularity), rec.amount);
        }
        totals
    }

    /// Sum of the amounts dated within `period`
    pub fn period_total(&self, period: Period) -> Amount {
        self.records
            .iter()
            .filter(|rec| period.contains(rec.date))
            .map(|rec| rec.amount)
            .sum()
    }
}
