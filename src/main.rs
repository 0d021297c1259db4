mod cli;
mod error;
mod lib;
mod load;
mod settings;

use std::io;
use tracing_subscriber::EnvFilter;

use cli::{menu::Menu, plot::SvgFile, prompt::Console, report::Report};
use lib::budget::Budget;
use load::Store;
use settings::Settings;

fn main() {
    let args = match settings::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };
    let settings = match settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprint!("{}", Report::from(&e));
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("spendlog={}", settings.log_level)))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(settings) {
        tracing::error!("{}", e);
        eprint!("{}", Report::from(&e));
        std::process::exit(1);
    }
}

fn run(settings: Settings) -> error::Result<()> {
    tracing::debug!("{:?}", settings);
    let store = Store::new(&settings.data_file);
    store.ensure_initialized()?;

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let mut menu = Menu::new(
        console,
        store,
        Budget::new(settings.monthly_budget),
        SvgFile::new(&settings.chart_file),
    );
    menu.run()?;
    Ok(())
}
