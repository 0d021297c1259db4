use std::fmt;

use crate::lib::{
    entry::{Amount, Expense},
    period::Period,
    summary::Totals,
};
use crate::load::DATE_FORMAT;

/// Box-drawn text table
pub struct Table {
    title: Option<String>,
    columns: Vec<ColFmt>,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    right: bool,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

impl Table {
    /// Empty table with one column per label, left-aligned
    pub fn new(labels: &[&str]) -> Self {
        Self {
            title: None,
            columns: labels
                .iter()
                .map(|l| ColFmt::with_label(BoxFmt::from(l.to_string())))
                .collect(),
        }
    }

    pub fn with_title<S: ToString>(mut self, title: S) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Align column `idx` to the right, for numbers
    pub fn right(mut self, idx: usize) -> Self {
        if let Some(col) = self.columns.get_mut(idx) {
            col.right = true;
        }
        self
    }

    /// Add a line; missing cells are left blank and extra cells are dropped
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut cells = cells.into_iter();
        for col in &mut self.columns {
            col.push(BoxFmt::from(cells.next().unwrap_or_default()));
        }
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(ColFmt::len).unwrap_or(0)
    }

    /// Two-column table of grouped sums
    pub fn from_totals<K>(key_label: &str, totals: &Totals<K>) -> Self
    where
        K: Ord + fmt::Display,
    {
        let mut table = Table::new(&[key_label, "Amount"]).right(1);
        for (key, amount) in totals.iter() {
            table.push_row(vec![key.to_string(), BoxFmt::amount(amount).text]);
        }
        table
    }

    /// Grouped sums per week or month, with the first and last day of each
    pub fn from_periods(key_label: &str, totals: &Totals<Period>) -> Self {
        let mut table = Table::new(&[key_label, "From", "To", "Amount"]).right(3);
        let day = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
        };
        for (period, amount) in totals.iter() {
            table.push_row(vec![
                period.to_string(),
                day(period.start()),
                day(period.end()),
                BoxFmt::amount(amount).text,
            ]);
        }
        table
    }

    /// One line per expense
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut table = Table::new(&["Date", "Category", "Amount", "Description"]).right(2);
        for exp in expenses {
            table.push_row(vec![
                exp.date.format(DATE_FORMAT).to_string(),
                exp.category.clone(),
                BoxFmt::amount(exp.amount).text,
                exp.description.replace('\n', " "),
            ]);
        }
        table
    }
}

impl BoxFmt {
    /// Width counts characters: one terminal column per `char`
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }

    fn amount(a: Amount) -> Self {
        Self::from(format!("{}", a))
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            right: false,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        // upper border
        self.border(f, ULCORNER, LOJOIN, URCORNER)?;
        // title line
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        self.border(f, RTJOIN, CROSS, LTJOIN)?;
        // main block
        for idx in 0..self.len() {
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        // lower border
        self.border(f, DLCORNER, HIJOIN, DRCORNER)
    }
}

impl Table {
    fn border(&self, f: &mut fmt::Formatter, left: &str, join: &str, right: &str) -> fmt::Result {
        write!(f, "{}", left)?;
        for (i, c) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", join)?;
            }
            c.hline(f)?;
        }
        writeln!(f, "{}", right)
    }
}

impl ColFmt {
    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, false)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize) -> fmt::Result {
        self.boxes[idx].write(f, self.width, self.right)
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

impl BoxFmt {
    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let padding = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", padding, self.text)
        } else {
            write!(f, " {}{} ", self.text, padding)
        }
    }
}
