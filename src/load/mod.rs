//! Persistence of the expense log
//!
//! The log is a CSV file with the header `Date,Category,Amount,Description`.
//! Rows are only ever appended, never rewritten.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::error::{AppError, Result};
use crate::lib::entry::{Amount, Expense};

pub const HEADERS: [&str; 4] = ["Date", "Category", "Amount", "Description"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// On-disk layout of a single expense
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Description", default)]
    description: String,
}

impl From<&Expense> for Row {
    fn from(exp: &Expense) -> Self {
        Self {
            date: exp.date.format(DATE_FORMAT).to_string(),
            category: exp.category.clone(),
            amount: exp.amount.value().to_string(),
            description: exp.description.clone(),
        }
    }
}

/// Handle on the CSV file holding every recorded expense
///
/// Nothing is cached: each read goes back to the file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create the file with only a header row, unless it already exists
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::info!("creating expense log at {}", self.path.display());
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(HEADERS)?;
        wtr.flush()?;
        Ok(())
    }

    /// Add one expense at the end of the log
    pub fn append(&self, expense: &Expense) -> Result<()> {
        let fresh = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if fresh {
            wtr.write_record(HEADERS)?;
        }
        wtr.serialize(Row::from(expense))?;
        wtr.flush()?;
        tracing::debug!(
            "appended {} {} {} to {}",
            expense.date,
            expense.category,
            expense.amount,
            self.path.display()
        );
        Ok(())
    }

    /// Read back every expense, in the order they were appended
    ///
    /// A missing file is an empty log. Any unreadable row fails the whole load.
    pub fn load_all(&self) -> Result<Vec<Expense>> {
        if !self.path.exists() {
            tracing::debug!("{} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let headers = rdr.headers()?.clone();
        let mut expenses = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row: Row = record.deserialize(Some(&headers))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let date = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT).map_err(|_| {
                AppError::Date {
                    file: self.path.clone(),
                    line,
                    value: row.date.clone(),
                }
            })?;
            let parsed = row.amount.trim().parse::<f64>();
            let amount = match parsed {
                Ok(value) if value.is_finite() => Amount(value),
                _ => {
                    return Err(AppError::Amount {
                        file: self.path.clone(),
                        line,
                        value: row.amount,
                    })
                }
            };
            expenses.push(Expense {
                date,
                category: row.category,
                amount,
                description: row.description,
            });
        }
        tracing::debug!("loaded {} expenses from {}", expenses.len(), self.path.display());
        Ok(expenses)
    }

    /// The `count` latest expenses by date, newest first
    ///
    /// Expenses sharing a date stay in the order they were appended.
    pub fn recent(&self, count: usize) -> Result<Vec<Expense>> {
        let mut expenses = self.load_all()?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses.truncate(count);
        Ok(expenses)
    }
}
