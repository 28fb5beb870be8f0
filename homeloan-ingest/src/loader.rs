//! Load every export of one account, concatenated in file order, parsed and
//! filtered to transactions strictly after the configured start date.

use std::path::{Path, PathBuf};

use homeloan_core::{Result, StatementConfig};
use log::{debug, info};

use crate::parsers::six_column::parse_six_column_csv;
use crate::types::{AccountKind, TransactionRecord};

/// Expand a glob-style file set. Matches come back sorted by path; a pattern
/// matching nothing yields an empty list.
pub fn expand_file_set(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(p) if p.is_file() => paths.push(p),
            Ok(_) => {}
            Err(e) => return Err(e.into_error().into()),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load one account's statements from `dir` using `pattern` (e.g. "offset*").
///
/// Offset rows missing a description, credit amount or balance are dropped;
/// mortgage rows are kept whole because interest-saved annotations may sit on
/// rows without an amount.
pub fn load_statements(
    kind: AccountKind,
    dir: &Path,
    pattern: &str,
    config: &StatementConfig,
) -> Result<Vec<TransactionRecord>> {
    // only `pattern` is a glob; the directory is taken literally
    let full_pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let files = expand_file_set(&full_pattern.to_string_lossy())?;

    if files.is_empty() {
        info!(
            "no {} statements match {} in {}; treating as empty",
            kind.label(),
            pattern,
            dir.display()
        );
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for file in &files {
        let parsed = parse_six_column_csv(file, config.has_headers)?;
        debug!("{}: {} rows from {}", kind.label(), parsed.len(), file.display());
        rows.extend(parsed);
    }

    Ok(filter_rows(kind, rows, config))
}

/// Apply the start-date bound and the per-account completeness rule.
pub fn filter_rows(
    kind: AccountKind,
    rows: Vec<TransactionRecord>,
    config: &StatementConfig,
) -> Vec<TransactionRecord> {
    let before = rows.len();
    let kept: Vec<_> = rows
        .into_iter()
        .filter(|r| r.transaction_date > config.start_date)
        .filter(|r| kind == AccountKind::Mortgage || r.is_complete())
        .collect();
    debug!(
        "{}: kept {} of {} rows after {}",
        kind.label(),
        kept.len(),
        before,
        config.start_date
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("homeloan-ingest-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config() -> StatementConfig {
        StatementConfig::new("12345", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    const HEADER: &str = "Date,Processed,Description,Debit,Credit,Balance\n";

    #[test]
    fn test_missing_file_set_is_empty() {
        let dir = scratch_dir("missing");
        let rows = load_statements(AccountKind::Offset, &dir, "offset*", &config()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_directory_name_is_not_a_pattern() {
        let dir = scratch_dir("statements [2024]");
        fs::write(
            dir.join("offset_a.csv"),
            format!("{HEADER}10 Jan 2024,,Salary,,100.00,1000.00\n"),
        )
        .unwrap();

        let rows = load_statements(AccountKind::Offset, &dir, "offset*", &config()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].balance, Some(rust_decimal::Decimal::from(1000)));
    }

    #[test]
    fn test_concatenates_in_file_order() {
        let dir = scratch_dir("concat");
        fs::write(
            dir.join("offset_b.csv"),
            format!("{HEADER}10 Feb 2024,,Salary,,100.00,1100.00\n"),
        )
        .unwrap();
        fs::write(
            dir.join("offset_a.csv"),
            format!("{HEADER}10 Jan 2024,,Salary,,100.00,1000.00\n"),
        )
        .unwrap();
        fs::write(dir.join("mortgage_a.csv"), HEADER).unwrap();

        let rows = load_statements(AccountKind::Offset, &dir, "offset*", &config()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(rows[1].transaction_date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    }

    #[test]
    fn test_start_date_is_exclusive() {
        let dir = scratch_dir("start");
        fs::write(
            dir.join("mortgage_2024.csv"),
            format!(
                "{HEADER}31 Dec 2023,,old,,1.00,1.00\n01 Jan 2024,,boundary,,1.00,1.00\n02 Jan 2024,,kept,,1.00,1.00\n"
            ),
        )
        .unwrap();

        let rows = load_statements(AccountKind::Mortgage, &dir, "mortgage*", &config()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "kept");
    }

    #[test]
    fn test_offset_drops_incomplete_rows_mortgage_keeps_them() {
        let dir = scratch_dir("complete");
        let body = format!("{HEADER}05 Jan 2024,,Note: you saved $12.00,,,\n06 Jan 2024,,Deposit,,5.00,10.00\n");
        fs::write(dir.join("offset_1.csv"), &body).unwrap();
        fs::write(dir.join("mortgage_1.csv"), &body).unwrap();

        let offset = load_statements(AccountKind::Offset, &dir, "offset*", &config()).unwrap();
        let mortgage = load_statements(AccountKind::Mortgage, &dir, "mortgage*", &config()).unwrap();
        assert_eq!(offset.len(), 1);
        assert_eq!(mortgage.len(), 2);
    }

    #[test]
    fn test_bad_file_aborts_account() {
        let dir = scratch_dir("bad");
        fs::write(dir.join("offset_1.csv"), format!("{HEADER}5th January,,x,,1.00,1.00\n")).unwrap();
        let err = load_statements(AccountKind::Offset, &dir, "offset*", &config()).unwrap_err();
        assert!(err.is_integrity_error());
    }
}
