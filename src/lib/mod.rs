//! Implementations that are useful accross the whole project
//!
//! Entry definition, period keys, aggregation and the budget check

pub mod budget;
pub mod entry;
pub mod period;
pub mod summary;
