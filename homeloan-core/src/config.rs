//! Statement pipeline configuration supplied by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What to do when one month carries more than one interest-saved annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with `ClassificationAmbiguity`.
    #[default]
    Reject,
    /// Keep the chronologically last annotation and log a warning.
    KeepLast,
}

/// Inputs the loader and classifier need from the calling environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Account number that appears in repayment transfers ("TFR FROM <n> TFR").
    pub account_number: String,
    /// Transactions on or before this date are excluded.
    pub start_date: NaiveDate,
    /// Whether each export starts with a header row to discard.
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
    #[serde(default)]
    pub duplicate_interest_saved: DuplicatePolicy,
}

fn default_has_headers() -> bool {
    true
}

impl StatementConfig {
    pub fn new(account_number: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            account_number: account_number.into(),
            start_date,
            has_headers: true,
            duplicate_interest_saved: DuplicatePolicy::Reject,
        }
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_interest_saved = policy;
        self
    }
}
