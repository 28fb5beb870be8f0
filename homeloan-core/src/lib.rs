//! homeloan-core: shared types for the mortgage/offset tracker

pub mod budget;
pub mod config;
pub mod error;
pub mod time;

pub use budget::{BudgetKind, BudgetLineItem, Frequency, monthly_equivalent};
pub use config::{DuplicatePolicy, StatementConfig};
pub use error::{HomeloanError, Result};
pub use time::{YearMonth, parse_statement_date};
