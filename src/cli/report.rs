//! Pretty-printing facility for messages addressed to the user
//!
//! A `Report` aggregates a label, explanatory lines and hints, and renders
//! them with colors: red for errors, yellow for warnings.
//!
//! # Example
//!
//! ```rust
//! Report::warning("Invalid date format. Use YYYY-MM-DD.")
//!     .text("'2024/13/40' is not a date in the YYYY-MM-DD format")
//!     .hint("press Enter to use today's date")
//! ```
//!
//! ```txt
//! --> Warning: Invalid date format. Use YYYY-MM-DD.
//!  |  '2024/13/40' is not a date in the YYYY-MM-DD format
//!  |      ? hint: press Enter to use today's date
//! ```

use std::fmt;

use crate::error::{AppError, InputError};

/// Report for a single problem
///
/// All messages (`label` passed to the constructor, arguments of `hint`
/// and `text`) should fit in a single line.
#[must_use]
#[derive(Debug)]
pub struct Report {
    /// determines the label (warning/error) and the color (yellow/red)
    fatal: bool,
    label: String,
    items: Vec<Item>,
}

#[derive(Debug)]
enum Item {
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

impl Report {
    /// Create a report for a failed operation
    pub fn error<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Create a report for a recoverable mistake
    pub fn warning<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: false,
            ..Self::error(msg)
        }
    }

    /// Add an important note
    pub fn text<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(mut self, msg: S) -> Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }
}

#[cfg(test)]
impl Report {
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl From<&InputError> for Report {
    fn from(err: &InputError) -> Self {
        match err {
            InputError::Date(_) => Report::warning("Invalid date format. Use YYYY-MM-DD.")
                .text(err)
                .hint("press Enter at the date prompt to use today's date"),
            InputError::Amount(_) => Report::warning("Invalid amount.")
                .text(err)
                .hint("use a plain number such as 12.50"),
            InputError::Encoding => Report::warning("Expense discarded.")
                .text(err)
                .hint("check the encoding of your terminal"),
            InputError::Eof => Report::warning("Expense discarded.").text(err),
        }
    }
}

impl From<&AppError> for Report {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Date { file, .. } | AppError::Amount { file, .. } => {
                Report::error("Malformed expense log")
                    .text(err)
                    .hint(format!("fix or remove the offending row in {}", file.display()))
            }
            AppError::Csv(_) => Report::error("Malformed expense log")
                .text(err)
                .hint("every row needs a YYYY-MM-DD date and a numeric amount"),
            AppError::Io(_) => Report::error("Could not access the expense log").text(err),
            AppError::Chart(_) => Report::error("Could not display the chart").text(err),
            AppError::Config(_) | AppError::Setting { .. } => {
                Report::error("Invalid configuration").text(err)
            }
        }
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, header) = if self.fatal {
            (RED, "--> Error")
        } else {
            (YELLOW, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}
