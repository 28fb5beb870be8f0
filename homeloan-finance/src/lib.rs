//! homeloan-finance: mortgage transaction rules, monthly aggregation, offset/mortgage
//! reconciliation, presentation tables and the budget tables

pub mod aggregator;
pub mod budget;
pub mod budget_store;
pub mod charts;
pub mod classifier;
pub mod pipeline;
pub mod reconcile;
pub mod table;

pub use aggregator::{MonthlyEntry, MonthlyLedger, aggregate_mortgage, aggregate_offset};
pub use budget::{BudgetPaths, BudgetSummary, breakdown_by_category, breakdown_by_name};
pub use budget_store::{BudgetRow, BudgetTable, load_items, save_items};
pub use classifier::{Classified, Classifier};
pub use pipeline::{AccountRows, StatementSources, load_accounts, process_statements, reconcile_accounts};
pub use reconcile::{LifetimeSummary, MonthlySeries, ReconciledMonth, Reconciliation, reconcile};
pub use table::{Cell, Table, monthly_table, summary_table};
