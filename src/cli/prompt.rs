//! Line-oriented interaction and validation of typed-in expenses
//!
//! An expense is entered one field at a time and is all-or-nothing:
//! the first invalid field discards everything typed so far.

use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

use crate::error::InputError;
use crate::load::DATE_FORMAT;
use crate::lib::entry::Expense;

/// Pair of input and output streams the menu talks through
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line, without its line terminator
    ///
    /// A line that is not UTF-8 is reported as `InputError::Encoding` and
    /// an exhausted input as `InputError::Eof`.
    pub fn ask(&mut self, question: &str) -> io::Result<Result<String, InputError>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(Err(InputError::Eof));
        }
        while raw.ends_with(b"\n") || raw.ends_with(b"\r") {
            raw.pop();
        }
        Ok(String::from_utf8(raw).map_err(|_| InputError::Encoding))
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }
}

#[cfg(test)]
impl<R, W> Console<R, W> {
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Blank means today, anything else must be `YYYY-MM-DD`
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| InputError::Date(raw.to_string()))
}

/// Any finite real number, negative ones included
pub fn parse_amount(raw: &str) -> Result<f64, InputError> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::Amount(raw.to_string())),
    }
}

/// Ask for the four fields of an expense
///
/// The outer `Result` is for failures of the streams themselves,
/// the inner one for invalid or missing input.
pub fn read_expense<R, W>(
    console: &mut Console<R, W>,
    today: NaiveDate,
) -> io::Result<Result<Expense, InputError>>
where
    R: BufRead,
    W: Write,
{
    macro_rules! field {
        ( $question:expr ) => {
            match console.ask($question)? {
                Ok(line) => line,
                Err(e) => return Ok(Err(e)),
            }
        };
    }

    let raw_date = field!("Enter date (YYYY-MM-DD) or press Enter for today: ");
    let date = match parse_date(&raw_date, today) {
        Ok(date) => date,
        Err(e) => return Ok(Err(e)),
    };
    let category = field!("Enter category (e.g., Food, Transport, Bills): ")
        .trim()
        .to_string();
    let raw_amount = field!("Enter amount: ");
    let amount = match parse_amount(&raw_amount) {
        Ok(amount) => amount,
        Err(e) => return Ok(Err(e)),
    };
    let description = field!("Enter description (optional): ");
    Ok(Ok(Expense::new(date, category, amount, description)))
}
