//! Description-pattern rules for mortgage account transactions.
//!
//! Three independent checks run on every row:
//! - repayment transfer from the configured account ("TFR FROM <n> TFR")
//! - interest charge ("Loan Interest")
//! - an embedded interest-saved amount ("$1,234.56")
//!
//! Matching is case-insensitive and a row may hit more than one rule.

use homeloan_core::{HomeloanError, Result};
use homeloan_ingest::TransactionRecord;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;

/// What the rules found in one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classified {
    pub is_repayment: bool,
    pub is_interest: bool,
    pub interest_saved: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    repayment: Regex,
    interest: Regex,
    saved_amount: Regex,
}

impl Classifier {
    pub fn new(account_number: &str) -> Result<Self> {
        let repayment = format!("TFR FROM {} TFR", regex::escape(account_number.trim()));
        Ok(Self {
            repayment: case_insensitive(&repayment)?,
            interest: case_insensitive("Loan Interest")?,
            saved_amount: Regex::new(r"\$([\d,]+\.\d{2})").map_err(invalid_rule)?,
        })
    }

    pub fn is_repayment(&self, description: &str) -> bool {
        self.repayment.is_match(description)
    }

    pub fn is_interest(&self, description: &str) -> bool {
        self.interest.is_match(description)
    }

    /// First "$d,ddd.dd" amount in the description, if any.
    pub fn interest_saved(&self, description: &str) -> Option<Decimal> {
        let caps = self.saved_amount.captures(description)?;
        caps[1].replace(',', "").parse().ok()
    }

    pub fn classify(&self, txn: &TransactionRecord) -> Classified {
        let desc = txn.description.as_str();
        Classified {
            is_repayment: self.is_repayment(desc),
            is_interest: self.is_interest(desc),
            interest_saved: self.interest_saved(desc),
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(invalid_rule)
}

fn invalid_rule(e: regex::Error) -> HomeloanError {
    HomeloanError::Rule(e.to_string())
}
