//! Everything that talks to the user: prompts, menu, tables, charts

pub mod menu;
pub mod plot;
pub mod prompt;
pub mod report;
pub mod table;
