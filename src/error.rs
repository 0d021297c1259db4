use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid setting '{key}': {reason}")]
    Setting { key: &'static str, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{}:{line}: unreadable date '{value}'", file.display())]
    Date {
        file: PathBuf,
        line: u64,
        value: String,
    },
    #[error("{}:{line}: unreadable amount '{value}'", file.display())]
    Amount {
        file: PathBuf,
        line: u64,
        value: String,
    },
    #[error("chart error: {0}")]
    Chart(String),
}

/// Why an expense typed in by the user was discarded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a date in the YYYY-MM-DD format")]
    Date(String),
    #[error("'{0}' is not a number")]
    Amount(String),
    #[error("the line typed is not valid UTF-8")]
    Encoding,
    #[error("input ended before the expense was complete")]
    Eof,
}
