//! Runtime settings
//!
//! Layered from lowest to highest precedence: built-in defaults, an optional
//! TOML file (`spendlog.toml` or `--config`), `SPENDLOG_*` environment
//! variables, command-line flags.

use clap::{crate_version, App, Arg};
use serde::Deserialize;
use std::{ffi::OsString, path::PathBuf};

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_NAME: &str = "spendlog";
const ENV_PREFIX: &str = "SPENDLOG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_file: PathBuf,
    pub monthly_budget: f64,
    pub chart_file: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("expenses.csv"),
            monthly_budget: 20000.0,
            chart_file: std::env::temp_dir().join("spendlog-chart.svg"),
            log_level: "warn".to_string(),
        }
    }
}

/// Command-line flags, all optional
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub budget: Option<String>,
    pub chart: Option<PathBuf>,
}

pub fn parse_args<I, T>(args: I) -> std::result::Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = App::new("spendlog")
        .version(crate_version!())
        .about("Personal expense tracker")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("Settings file (TOML)"),
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("FILE")
                .takes_value(true)
                .help("Expense log (CSV)"),
        )
        .arg(
            Arg::with_name("budget")
                .short("b")
                .long("budget")
                .value_name("AMOUNT")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Monthly budget threshold"),
        )
        .arg(
            Arg::with_name("chart")
                .long("chart")
                .value_name("FILE")
                .takes_value(true)
                .help("Where the chart is written while it is displayed"),
        )
        .get_matches_from_safe(args)?;
    Ok(Args {
        config: matches.value_of_os("config").map(PathBuf::from),
        file: matches.value_of_os("file").map(PathBuf::from),
        budget: matches.value_of("budget").map(String::from),
        chart: matches.value_of_os("chart").map(PathBuf::from),
    })
}

/// Merge every source of settings
pub fn load(args: &Args) -> Result<Settings> {
    layered(args, config::Environment::with_prefix(ENV_PREFIX))
}

/// Defaults, then the settings file, then `env`, then the flags in `args`
fn layered(args: &Args, env: config::Environment) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };
    let mut settings: Settings = config::Config::builder()
        .add_source(file)
        .add_source(env.try_parsing(true))
        .build()?
        .try_deserialize()?;

    if let Some(path) = &args.file {
        settings.data_file = path.clone();
    }
    if let Some(raw) = &args.budget {
        settings.monthly_budget = raw.trim().parse().map_err(|_| AppError::Setting {
            key: "monthly_budget",
            reason: format!("'{}' is not a number", raw),
        })?;
    }
    if let Some(path) = &args.chart {
        settings.chart_file = path.clone();
    }
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if !self.monthly_budget.is_finite() || self.monthly_budget <= 0.0 {
            return Err(AppError::Setting {
                key: "monthly_budget",
                reason: format!("{} is not a positive amount", self.monthly_budget),
            });
        }
        Ok(())
    }
}
