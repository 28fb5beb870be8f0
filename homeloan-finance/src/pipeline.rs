//! End-to-end statement processing: load both accounts, classify, aggregate
//! and reconcile. Recomputed from the files on every call.

use std::path::PathBuf;

use homeloan_core::{Result, StatementConfig};
use homeloan_ingest::{AccountKind, TransactionRecord, load_statements};

use crate::aggregator::{aggregate_mortgage, aggregate_offset};
use crate::classifier::Classifier;
use crate::reconcile::{Reconciliation, reconcile};

/// Where the account exports live.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSources {
    pub dir: PathBuf,
    pub offset_pattern: String,
    pub mortgage_pattern: String,
}

impl StatementSources {
    /// Default `offset*` / `mortgage*` patterns under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            offset_pattern: AccountKind::Offset.default_pattern().to_string(),
            mortgage_pattern: AccountKind::Mortgage.default_pattern().to_string(),
        }
    }
}

/// Filtered rows of both accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountRows {
    pub offset: Vec<TransactionRecord>,
    pub mortgage: Vec<TransactionRecord>,
}

pub fn load_accounts(sources: &StatementSources, config: &StatementConfig) -> Result<AccountRows> {
    Ok(AccountRows {
        offset: load_statements(AccountKind::Offset, &sources.dir, &sources.offset_pattern, config)?,
        mortgage: load_statements(
            AccountKind::Mortgage,
            &sources.dir,
            &sources.mortgage_pattern,
            config,
        )?,
    })
}

/// Classify, aggregate and reconcile already-loaded rows.
pub fn reconcile_accounts(rows: &AccountRows, config: &StatementConfig) -> Result<Reconciliation> {
    let classifier = Classifier::new(&config.account_number)?;
    let offset = aggregate_offset(&rows.offset);
    let mortgage = aggregate_mortgage(&rows.mortgage, &classifier, config.duplicate_interest_saved)?;
    Ok(reconcile(&offset, &mortgage))
}

pub fn process_statements(sources: &StatementSources, config: &StatementConfig) -> Result<Reconciliation> {
    let rows = load_accounts(sources, config)?;
    reconcile_accounts(&rows, config)
}
