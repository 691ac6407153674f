//! Role-scoped terminal views: tables and CLI command runners

mod cli;
mod tables;

pub use cli::*;
pub use tables::{requests_table, staff_table, stats_table};
