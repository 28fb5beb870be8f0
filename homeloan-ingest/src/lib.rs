//! homeloan-ingest: account export loading (offset and mortgage statements).

pub mod loader;
pub mod parsers;
pub mod types;

pub use loader::{expand_file_set, load_statements};
pub use parsers::six_column::parse_six_column_csv;
pub use types::{AccountKind, TransactionRecord};
