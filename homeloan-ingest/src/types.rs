use chrono::NaiveDate;
use homeloan_core::YearMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which linked account an export belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Offset,
    Mortgage,
}

impl AccountKind {
    /// Default file-name prefix of this account's exports.
    pub fn default_pattern(&self) -> &'static str {
        match self {
            AccountKind::Offset => "offset*",
            AccountKind::Mortgage => "mortgage*",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Offset => "offset",
            AccountKind::Mortgage => "mortgage",
        }
    }
}

/// One line of a six-column account export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_date: NaiveDate,
    /// Calendar month of `transaction_date`.
    pub month: YearMonth,
    /// Free text, not interpreted.
    pub processed_date: String,
    pub description: String,
    /// Signed amount; blank cells are `None`.
    pub credit_amount: Option<Decimal>,
    /// Running balance after the transaction; blank cells are `None`.
    pub balance: Option<Decimal>,
}

impl TransactionRecord {
    /// True when every field the offset ledger relies on is present.
    pub fn is_complete(&self) -> bool {
        !self.description.trim().is_empty() && self.credit_amount.is_some() && self.balance.is_some()
    }
}
