//! Error type shared by the statement pipeline and the budget store.
//!
//! Missing files are not represented here: a file set that matches nothing, or
//! an absent budget file, is an empty dataset. Everything below is a data
//! integrity problem and is returned to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::time::YearMonth;

#[derive(Debug, Error)]
pub enum HomeloanError {
    #[error("{}:{line}: transaction date '{value}' does not match DD Mon YYYY", .path.display())]
    DateParse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{}:{line}: expected {expected} columns, found {found}", .path.display())]
    SchemaMismatch {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: column '{column}' is not a decimal amount: '{value}'", .path.display())]
    AmountParse {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{month}: {} interest-saved annotations found ({})", .values.len(), join_values(.values))]
    ClassificationAmbiguity {
        month: YearMonth,
        values: Vec<rust_decimal::Decimal>,
    },

    #[error("unknown frequency '{value}' (expected Weekly, Fortnightly, Monthly, Quarterly or Yearly)")]
    InvalidFrequency { value: String },

    #[error("invalid match rule: {0}")]
    Rule(String),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_values(values: &[rust_decimal::Decimal]) -> String {
    values
        .iter()
        .map(|v| format!("${v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, HomeloanError>;

impl HomeloanError {
    /// True for errors that describe malformed source data rather than an
    /// environment failure.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            HomeloanError::DateParse { .. }
                | HomeloanError::SchemaMismatch { .. }
                | HomeloanError::AmountParse { .. }
                | HomeloanError::ClassificationAmbiguity { .. }
                | HomeloanError::InvalidFrequency { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_schema_mismatch_message() {
        let err = HomeloanError::SchemaMismatch {
            path: PathBuf::from("data/offset_2024.csv"),
            line: 3,
            expected: 6,
            found: 5,
        };
        assert_eq!(
            err.to_string(),
            "data/offset_2024.csv:3: expected 6 columns, found 5"
        );
        assert!(err.is_integrity_error());
    }

    #[test]
    fn test_ambiguity_lists_values() {
        let err = HomeloanError::ClassificationAmbiguity {
            month: YearMonth::new(2024, 2).unwrap(),
            values: vec![Decimal::new(4567, 2), Decimal::new(1200, 2)],
        };
        assert_eq!(
            err.to_string(),
            "2024-02: 2 interest-saved annotations found ($45.67, $12.00)"
        );
    }

    #[test]
    fn test_io_is_not_integrity() {
        let err = HomeloanError::from(std::io::Error::other("disk"));
        assert!(!err.is_integrity_error());
    }
}
