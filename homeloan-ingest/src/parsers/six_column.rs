//! Six-column account export parser.
//!
//! Every export (offset and mortgage alike) is read positionally as:
//!   transaction date, processed date, description, (unused), credit amount, balance
//!
//!   05 Jan 2024,06 Jan 2024,TFR FROM 12345 TFR,,2000.00,-349120.55
//!
//! Rows with any other column count are rejected rather than re-aligned.

use std::io::Read;
use std::path::Path;

use homeloan_core::{HomeloanError, Result, YearMonth, parse_statement_date};
use rust_decimal::Decimal;

use crate::types::TransactionRecord;

pub const EXPECTED_COLUMNS: usize = 6;

const COL_DATE: usize = 0;
const COL_PROCESSED: usize = 1;
const COL_DESCRIPTION: usize = 2;
const COL_CREDIT: usize = 4;
const COL_BALANCE: usize = 5;

/// Parse one export file. Rows keep file order; nothing is filtered.
pub fn parse_six_column_csv(path: impl AsRef<Path>, has_headers: bool) -> Result<Vec<TransactionRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    parse_six_column_reader(file, path, has_headers)
}

/// Parse from any reader; `source` is only used in error messages.
pub fn parse_six_column_reader<R: Read>(
    reader: R,
    source: &Path,
    has_headers: bool,
) -> Result<Vec<TransactionRecord>> {
    // Headers are skipped by hand so a bank header row with its own column
    // names never goes through the schema check.
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut out = Vec::new();
    let mut skip_header = has_headers;

    for result in rdr.records() {
        let record = result?;
        if skip_header {
            skip_header = false;
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != EXPECTED_COLUMNS {
            return Err(HomeloanError::SchemaMismatch {
                path: source.to_path_buf(),
                line,
                expected: EXPECTED_COLUMNS,
                found: record.len(),
            });
        }

        let date_str = record.get(COL_DATE).unwrap_or("").trim();
        let transaction_date =
            parse_statement_date(date_str).ok_or_else(|| HomeloanError::DateParse {
                path: source.to_path_buf(),
                line,
                value: date_str.to_string(),
            })?;

        let credit_amount = parse_amount(record.get(COL_CREDIT), "credit", source, line)?;
        let balance = parse_amount(record.get(COL_BALANCE), "balance", source, line)?;

        out.push(TransactionRecord {
            transaction_date,
            month: YearMonth::of(transaction_date),
            processed_date: record.get(COL_PROCESSED).unwrap_or("").trim().to_string(),
            description: record.get(COL_DESCRIPTION).unwrap_or("").trim().to_string(),
            credit_amount,
            balance,
        });
    }

    Ok(out)
}

fn parse_amount(
    raw: Option<&str>,
    column: &'static str,
    source: &Path,
    line: u64,
) -> Result<Option<Decimal>> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let cleaned = raw.replace(',', "");
    cleaned
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| HomeloanError::AmountParse {
            path: source.to_path_buf(),
            line,
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(text: &str, has_headers: bool) -> Result<Vec<TransactionRecord>> {
        parse_six_column_reader(text.as_bytes(), Path::new("test.csv"), has_headers)
    }

    #[test]
    fn test_parses_basic_rows() {
        let text = "\
Date,Processed,Description,Debit,Credit,Balance
05 Jan 2024,06 Jan 2024,Salary ACME,,3000.00,15000.00
15 Jan 2024,15 Jan 2024,TFR FROM 12345 TFR,,\"2,000.00\",\"-349,120.55\"
";
        let txns = parse(text, true).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].transaction_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(txns[0].month, YearMonth::new(2024, 1).unwrap());
        assert_eq!(txns[0].processed_date, "06 Jan 2024");
        assert_eq!(txns[1].credit_amount, Some(Decimal::new(200000, 2)));
        assert_eq!(txns[1].balance, Some(Decimal::new(-34912055, 2)));
    }

    #[test]
    fn test_blank_amounts_are_none() {
        let text = "05 Jan 2024,,Fee waived,,,100.00\n";
        let txns = parse(text, false).unwrap();
        assert_eq!(txns[0].credit_amount, None);
        assert_eq!(txns[0].balance, Some(Decimal::from(100)));
        assert!(!txns[0].is_complete());
    }

    #[test]
    fn test_wrong_column_count_is_schema_mismatch() {
        let text = "05 Jan 2024,Salary,3000.00,15000.00\n";
        let err = parse(text, false).unwrap_err();
        match err {
            HomeloanError::SchemaMismatch { expected, found, line, .. } => {
                assert_eq!(expected, 6);
                assert_eq!(found, 4);
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let text = "\
05 Jan 2024,,ok,,1.00,1.00
2024-01-06,,bad,,1.00,2.00
";
        let err = parse(text, false).unwrap_err();
        assert!(matches!(err, HomeloanError::DateParse { ref value, line: 2, .. } if value == "2024-01-06"));
    }

    #[test]
    fn test_bad_amount_is_reported() {
        let text = "05 Jan 2024,,x,,12abc,1.00\n";
        let err = parse(text, false).unwrap_err();
        assert!(matches!(err, HomeloanError::AmountParse { column: "credit", .. }));
    }

    #[test]
    fn test_header_row_not_schema_checked() {
        let text = "Account export for 12345\n05 Jan 2024,,x,,1.00,1.00\n";
        let txns = parse(text, true).unwrap();
        assert_eq!(txns.len(), 1);
    }
}
