//! The interactive loop
//!
//! The loop is a small state machine: from `Menu`, the option typed selects
//! an action state; every action runs to completion and goes back to `Menu`.
//! Only option 5 (or the end of the input) leads to `Exited`.

use chrono::NaiveDate;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::io::{self, BufRead, Write};

use crate::cli::{
    plot::{ChartViewer, Figure},
    prompt::{read_expense, Console},
    report::Report,
    table::Table,
};
use crate::error::{AppError, InputError};
use crate::lib::{
    budget::Budget,
    period::Granularity,
    summary::{Aggregator, NoData},
};
use crate::load::Store;

/// How many lines "View Recent Expenses" shows
pub const RECENT_COUNT: usize = 10;

const MENU: &str = "\n Personal Finance Tracker
1. Log Expense
2. View Recent Expenses
3. Generate Weekly/Monthly Summaries
4. Visualize Spending
5. Exit
";

/// Numbered menu options
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Choice {
    Log = 1,
    View,
    Summarize,
    Visualize,
    Exit,
}

impl Choice {
    pub fn parse(line: &str) -> Option<Self> {
        line.trim().parse::<u8>().ok().and_then(Self::from_u8)
    }

    fn target(self) -> State {
        match self {
            Choice::Log => State::Logging,
            Choice::View => State::Viewing,
            Choice::Summarize => State::Summarizing,
            Choice::Visualize => State::Visualizing,
            Choice::Exit => State::Exited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    Logging,
    Viewing,
    Summarizing,
    Visualizing,
    Exited,
}

/// What can happen to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// a line typed at the menu prompt
    Line(&'a str),
    /// a line typed at the menu prompt that could not be decoded
    Unreadable,
    /// the input is exhausted
    Eof,
    /// the current action finished, whatever its outcome
    Done,
}

impl State {
    pub fn transition(self, event: Event) -> State {
        match (self, event) {
            (State::Exited, _) => State::Exited,
            (State::Menu, Event::Line(line)) => {
                Choice::parse(line).map(Choice::target).unwrap_or(State::Menu)
            }
            (State::Menu, Event::Eof) => State::Exited,
            (State::Menu, Event::Unreadable | Event::Done) => State::Menu,
            (State::Logging | State::Viewing | State::Summarizing | State::Visualizing, _) => {
                State::Menu
            }
        }
    }
}

/// Everything an interactive session needs
pub struct Menu<R, W, V> {
    console: Console<R, W>,
    store: Store,
    budget: Budget,
    viewer: V,
    today: fn() -> NaiveDate,
}

impl<R, W, V> Menu<R, W, V>
where
    R: BufRead,
    W: Write,
    V: ChartViewer,
{
    pub fn new(console: Console<R, W>, store: Store, budget: Budget, viewer: V) -> Self {
        Self {
            console,
            store,
            budget,
            viewer,
            today: || chrono::Local::now().date_naive(),
        }
    }

    /// Loop until the user exits
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = State::Menu;
        while state != State::Exited {
            let next = self.step(state)?;
            tracing::debug!("{:?} -> {:?}", state, next);
            state = next;
        }
        writeln!(self.console.out(), "Exiting. Stay financially smart!")
    }

    fn step(&mut self, state: State) -> io::Result<State> {
        match state {
            State::Menu => {
                write!(self.console.out(), "{}", MENU)?;
                let line = self.console.ask("Choose an option: ")?;
                let event = match &line {
                    Ok(line) => Event::Line(line),
                    Err(InputError::Eof) => Event::Eof,
                    Err(_) => Event::Unreadable,
                };
                let next = state.transition(event);
                if next == State::Menu {
                    tracing::warn!("unrecognized menu choice {:?}", line);
                    writeln!(self.console.out(), "Invalid choice. Try again.")?;
                }
                return Ok(next);
            }
            State::Logging => self.log_expense()?,
            State::Viewing => self.view_recent()?,
            State::Summarizing => self.summarize()?,
            State::Visualizing => self.visualize()?,
            State::Exited => (),
        }
        Ok(state.transition(Event::Done))
    }

    fn log_expense(&mut self) -> io::Result<()> {
        let today = (self.today)();
        match read_expense(&mut self.console, today)? {
            Ok(expense) => match self.store.append(&expense) {
                Ok(()) => {
                    tracing::info!(
                        "recorded {} {} {}",
                        expense.date,
                        expense.category,
                        expense.amount
                    );
                    writeln!(self.console.out(), "Expense added successfully!")
                }
                Err(e) => self.fail(&e),
            },
            Err(e) => {
                tracing::warn!("expense discarded: {}", e);
                write!(self.console.out(), "{}", Report::from(&e))
            }
        }
    }

    fn view_recent(&mut self) -> io::Result<()> {
        let recent = match self.store.recent(RECENT_COUNT) {
            Ok(recent) => recent,
            Err(e) => return self.fail(&e),
        };
        let out = self.console.out();
        writeln!(out, "\nRecent Expenses:")?;
        if recent.is_empty() {
            writeln!(out, "No expenses recorded yet.")
        } else {
            write!(out, "{}", Table::from_expenses(&recent))
        }
    }

    fn summarize(&mut self) -> io::Result<()> {
        let records = match self.store.load_all() {
            Ok(records) => records,
            Err(e) => return self.fail(&e),
        };
        let agg = match Aggregator::new(&records) {
            Ok(agg) => agg,
            Err(NoData) => return writeln!(self.console.out(), "No data to analyze."),
        };
        let today = (self.today)();
        let out = self.console.out();
        writeln!(out)?;
        let categories = Table::from_totals("Category", &agg.sum_by_category());
        write!(out, "{}", categories.with_title("Total Spent by Category:"))?;
        for granularity in [Granularity::Week, Granularity::Month] {
            let name = granularity.name();
            writeln!(out)?;
            write!(
                out,
                "{}",
                Table::from_periods(name, &agg.sum_by_period(granularity))
                    .with_title(format!("{} Summary:", name))
            )?;
        }
        let check = self.budget.check(&agg, today);
        tracing::debug!("budget check {:?}", check);
        writeln!(out)?;
        write!(out, "{}", check)
    }

    fn visualize(&mut self) -> io::Result<()> {
        let records = match self.store.load_all() {
            Ok(records) => records,
            Err(e) => return self.fail(&e),
        };
        let agg = match Aggregator::new(&records) {
            Ok(agg) => agg,
            Err(NoData) => return writeln!(self.console.out(), "No data to visualize."),
        };
        let monthly = agg.sum_by_period(Granularity::Month);
        let figure = Figure::from_totals(&monthly, &agg.sum_by_category());
        if let Err(e) = self.viewer.open(&figure) {
            return self.fail(&e);
        }
        if let Some(path) = self.viewer.location() {
            let msg = format!("Chart saved to {}", path.display());
            writeln!(self.console.out(), "{}", msg)?;
        }
        // blocks until the user dismisses the chart
        let _ = self.console.ask("Press Enter to close the chart...")?;
        if let Err(e) = self.viewer.close() {
            return self.fail(&e);
        }
        Ok(())
    }

    fn fail(&mut self, err: &AppError) -> io::Result<()> {
        tracing::error!("{}", err);
        write!(self.console.out(), "{}", Report::from(err))
    }
}

#[cfg(test)]
impl<R, W, V> Menu<R, W, V> {
    /// Replace the wall clock
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::plot::test::Recorder;
    use crate::lib::entry::Expense;
    use crate::load::test::scratch;
    use std::{fs, io::Cursor};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    /// Play `input` against a store at `path`, return what was printed
    fn session<I: AsRef<[u8]>>(path: &std::path::Path, input: I) -> (String, Recorder) {
        let console = Console::new(Cursor::new(input.as_ref().to_vec()), Vec::new());
        let budget = Budget::new(20000.0);
        let mut menu =
            Menu::new(console, Store::new(path), budget, Recorder::default()).with_today(today);
        menu.run().unwrap();
        let shown = menu.viewer().shown.clone();
        let open = menu.viewer().open;
        let out = String::from_utf8(menu.into_console().into_output()).unwrap();
        (out, Recorder { shown, open })
    }

    #[test]
    fn transition_table() {
        macro_rules! tr {
            ( $from:ident, $ev:expr => $to:ident ) => {
                assert_eq!(State::$from.transition($ev), State::$to);
            };
        }
        tr!(Menu, Event::Line("1") => Logging);
        tr!(Menu, Event::Line("2") => Viewing);
        tr!(Menu, Event::Line(" 3 ") => Summarizing);
        tr!(Menu, Event::Line("4") => Visualizing);
        tr!(Menu, Event::Line("5") => Exited);
        tr!(Menu, Event::Line("6") => Menu);
        tr!(Menu, Event::Line("0") => Menu);
        tr!(Menu, Event::Line("exit") => Menu);
        tr!(Menu, Event::Line("") => Menu);
        tr!(Menu, Event::Unreadable => Menu);
        tr!(Menu, Event::Eof => Exited);
        tr!(Logging, Event::Done => Menu);
        tr!(Viewing, Event::Done => Menu);
        tr!(Summarizing, Event::Done => Menu);
        tr!(Visualizing, Event::Done => Menu);
        tr!(Exited, Event::Line("1") => Exited);
    }

    #[test]
    fn exit_immediately() {
        let path = scratch("menu-exit");
        let (out, _) = session(&path, "5\n");
        assert!(out.contains("1. Log Expense"));
        assert!(out.ends_with("Exiting. Stay financially smart!\n"));
    }

    #[test]
    fn end_of_input_exits() {
        let path = scratch("menu-eof");
        let (out, _) = session(&path, "");
        assert!(out.ends_with("Exiting. Stay financially smart!\n"));
    }

    #[test]
    fn unknown_choice_reprompts() {
        let path = scratch("menu-unknown");
        let (out, _) = session(&path, "9\nhello\n5\n");
        assert_eq!(out.matches("Invalid choice. Try again.").count(), 2);
        assert_eq!(out.matches("Choose an option: ").count(), 3);
    }

    #[test]
    fn undecodable_input_is_recovered() {
        let path = scratch("menu-encoding");
        let (out, _) = session(&path, &b"\xff\n1\n2024-01-01\nCaf\xe9\n5\n"[..]);
        assert_eq!(out.matches("Invalid choice. Try again.").count(), 1);
        assert!(out.contains("Expense discarded."));
        assert!(!out.contains("Expense added successfully!"));
        assert!(out.ends_with("Exiting. Stay financially smart!\n"));
        assert!(Store::new(&path).load_all().unwrap().is_empty());
    }

    #[test]
    fn logging_round_trip() {
        let path = scratch("menu-log");
        let (out, _) = session(&path, "1\n2024-05-01\nFood\n10\nlunch\n1\n\nTransport\n3\n\n5\n");
        assert_eq!(out.matches("Expense added successfully!").count(), 2);
        let stored = Store::new(&path).load_all().unwrap();
        assert_eq!(
            stored,
            vec![
                Expense::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), "Food", 10.0, "lunch"),
                Expense::new(today(), "Transport", 3.0, ""),
            ]
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn invalid_input_leaves_store_unchanged() {
        let path = scratch("menu-invalid");
        let store = Store::new(&path);
        store.ensure_initialized().unwrap();
        store
            .append(&Expense::new(today(), "Food", 1.0, ""))
            .unwrap();
        let before = fs::read_to_string(&path).unwrap();
        let (out, _) = session(&path, "1\n2024/13/40\n1\n2024-01-01\nFood\nabc\n5\n");
        assert!(out.contains("Invalid date format. Use YYYY-MM-DD."));
        assert!(out.contains("Invalid amount."));
        assert!(!out.contains("Expense added successfully!"));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn empty_store_reports_no_data() {
        let path = scratch("menu-empty");
        Store::new(&path).ensure_initialized().unwrap();
        let (out, rec) = session(&path, "2\n3\n4\n5\n");
        assert!(out.contains("No expenses recorded yet."));
        assert!(out.contains("No data to analyze."));
        assert!(out.contains("No data to visualize."));
        assert!(!out.contains("Total spent this month"));
        assert!(rec.shown.is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn summaries() {
        let path = scratch("menu-summary");
        let store = Store::new(&path);
        let rows = [
            (5, 2, "Food", 10.0),
            (5, 14, "Food", 5.0),
            (4, 1, "Transport", 3.0),
            (5, 15, "Rent", 18485.0),
        ];
        for (m, d, cat, val) in rows {
            store
                .append(&Expense::new(NaiveDate::from_ymd_opt(2024, m, d).unwrap(), cat, val, ""))
                .unwrap();
        }
        let (out, _) = session(&path, "3\n5\n");
        let cat = out.find("Total Spent by Category:").unwrap();
        let week = out.find("Week Summary:").unwrap();
        let month = out.find("Month Summary:").unwrap();
        assert!(cat < week && week < month);
        assert!(out.contains("│ Food      │    15.00 │"));
        assert!(out.contains("2024-W18"));
        assert!(out.contains("2024-W20"));
        assert!(out.find("│ 2024-04 ").unwrap() < out.find("│ 2024-05 ").unwrap());
        assert!(out.contains("Total spent this month (2024-05): $18500.00"));
        assert!(out.contains("Warning: You're close to reaching your monthly budget."));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn visualize_blocks_until_dismissed() {
        let path = scratch("menu-chart");
        let store = Store::new(&path);
        store
            .append(&Expense::new(today(), "Food", 12.0, ""))
            .unwrap();
        let (out, rec) = session(&path, "4\n\n5\n");
        assert_eq!(rec.shown.len(), 1);
        assert_eq!(rec.shown[0].bars.len(), 1);
        assert_eq!(rec.shown[0].slices[0].label, "Food");
        assert!(!rec.open);
        assert!(out.contains("Press Enter to close the chart..."));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn malformed_store_halts_operation() {
        let path = scratch("menu-malformed");
        fs::write(&path, "Date,Category,Amount,Description\nsoon,Food,1.0,\n").unwrap();
        let (out, rec) = session(&path, "3\n4\n2\n5\n");
        assert_eq!(out.matches("Malformed expense log").count(), 3);
        assert!(rec.shown.is_empty());
        assert!(out.ends_with("Exiting. Stay financially smart!\n"));
        fs::remove_file(&path).unwrap();
    }
}
