//! Group classified transactions into per-month ledger entries.
//!
//! A month with no matching transaction for a metric has `None` for it, not
//! zero, so the reconciliation join can tell "nothing happened" apart from
//! "sums to zero".

use std::collections::BTreeMap;

use homeloan_core::{DuplicatePolicy, HomeloanError, Result, YearMonth};
use homeloan_ingest::TransactionRecord;
use log::warn;
use rust_decimal::Decimal;

use crate::classifier::Classifier;

/// One account's figures for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyEntry {
    pub repayment_sum: Option<Decimal>,
    pub interest_sum: Option<Decimal>,
    pub interest_saved: Option<Decimal>,
    /// Balance of the chronologically last transaction in the month.
    pub last_balance: Option<Decimal>,
}

/// Month-indexed table for one account, ascending by month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyLedger {
    pub entries: BTreeMap<YearMonth, MonthlyEntry>,
}

impl MonthlyLedger {
    pub fn get(&self, month: &YearMonth) -> Option<&MonthlyEntry> {
        self.entries.get(month)
    }

    pub fn months(&self) -> impl Iterator<Item = &YearMonth> {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, month: YearMonth) -> &mut MonthlyEntry {
        self.entries.entry(month).or_default()
    }
}

/// Rows ordered by transaction date; same-day rows keep their export order.
pub fn sorted_by_date(rows: &[TransactionRecord]) -> Vec<&TransactionRecord> {
    let mut sorted: Vec<_> = rows.iter().collect();
    sorted.sort_by_key(|r| r.transaction_date);
    sorted
}

/// Last observed balance per month. Rows without a balance are skipped.
pub fn last_balances(rows: &[TransactionRecord]) -> BTreeMap<YearMonth, Decimal> {
    let mut out = BTreeMap::new();
    for r in sorted_by_date(rows) {
        if let Some(balance) = r.balance {
            out.insert(r.month, balance);
        }
    }
    out
}

/// Sum of credit amounts per month over rows matching `pred`. A month with at
/// least one match is present even if every matched amount was blank.
pub fn monthly_sums<F>(rows: &[TransactionRecord], pred: F) -> BTreeMap<YearMonth, Decimal>
where
    F: Fn(&TransactionRecord) -> bool,
{
    let mut out: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for r in rows.iter().filter(|r| pred(r)) {
        *out.entry(r.month).or_default() += r.credit_amount.unwrap_or_default();
    }
    out
}

/// Interest-saved annotation per month. More than one annotation in a month
/// is rejected or resolved to the last one, depending on `policy`.
pub fn interest_saved_by_month(
    rows: &[TransactionRecord],
    classifier: &Classifier,
    policy: DuplicatePolicy,
) -> Result<BTreeMap<YearMonth, Decimal>> {
    let mut found: BTreeMap<YearMonth, Vec<Decimal>> = BTreeMap::new();
    for r in sorted_by_date(rows) {
        if let Some(v) = classifier.interest_saved(&r.description) {
            found.entry(r.month).or_default().push(v);
        }
    }

    let mut out = BTreeMap::new();
    for (month, values) in found {
        let last = match values.last() {
            Some(v) => *v,
            None => continue,
        };
        if values.len() > 1 {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(HomeloanError::ClassificationAmbiguity { month, values });
                }
                DuplicatePolicy::KeepLast => {
                    warn!(
                        "{month}: {} interest-saved annotations, keeping ${last}",
                        values.len()
                    );
                }
            }
        }
        out.insert(month, last);
    }
    Ok(out)
}

/// Offset account: only balances matter.
pub fn aggregate_offset(rows: &[TransactionRecord]) -> MonthlyLedger {
    let mut ledger = MonthlyLedger::default();
    for (month, balance) in last_balances(rows) {
        ledger.entry(month).last_balance = Some(balance);
    }
    ledger
}

/// Mortgage account: balances plus the three classified streams.
pub fn aggregate_mortgage(
    rows: &[TransactionRecord],
    classifier: &Classifier,
    policy: DuplicatePolicy,
) -> Result<MonthlyLedger> {
    let mut ledger = MonthlyLedger::default();

    for (month, balance) in last_balances(rows) {
        ledger.entry(month).last_balance = Some(balance);
    }
    for (month, sum) in monthly_sums(rows, |r| classifier.is_repayment(&r.description)) {
        ledger.entry(month).repayment_sum = Some(sum);
    }
    for (month, sum) in monthly_sums(rows, |r| classifier.is_interest(&r.description)) {
        ledger.entry(month).interest_sum = Some(sum);
    }
    for (month, saved) in interest_saved_by_month(rows, classifier, policy)? {
        ledger.entry(month).interest_saved = Some(saved);
    }

    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(y: i32, m: u32, d: u32, desc: &str, credit: Option<i64>, balance: Option<i64>) -> TransactionRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        TransactionRecord {
            transaction_date: date,
            month: YearMonth::of(date),
            processed_date: String::new(),
            description: desc.to_string(),
            credit_amount: credit.map(Decimal::from),
            balance: balance.map(Decimal::from),
        }
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_last_balance_sorts_unordered_rows() {
        let rows = vec![
            row(2024, 1, 20, "b", Some(1), Some(300)),
            row(2024, 1, 5, "a", Some(1), Some(100)),
            row(2024, 2, 1, "c", Some(1), Some(400)),
        ];
        let balances = last_balances(&rows);
        assert_eq!(balances[&ym(2024, 1)], Decimal::from(300));
        assert_eq!(balances[&ym(2024, 2)], Decimal::from(400));
    }

    #[test]
    fn test_last_balance_same_day_keeps_export_order() {
        let rows = vec![
            row(2024, 1, 5, "first", Some(1), Some(100)),
            row(2024, 1, 5, "second", Some(1), Some(90)),
        ];
        assert_eq!(last_balances(&rows)[&ym(2024, 1)], Decimal::from(90));
    }

    #[test]
    fn test_last_balance_skips_blank() {
        let rows = vec![
            row(2024, 1, 5, "a", Some(1), Some(100)),
            row(2024, 1, 9, "note", None, None),
        ];
        assert_eq!(last_balances(&rows)[&ym(2024, 1)], Decimal::from(100));
    }

    #[test]
    fn test_monthly_sums_absent_vs_zero() {
        let rows = vec![
            row(2024, 1, 5, "TFR FROM 1 TFR", Some(1000), Some(0)),
            row(2024, 1, 20, "TFR FROM 1 TFR", Some(500), Some(0)),
            row(2024, 2, 5, "other", Some(7), Some(0)),
            row(2024, 3, 5, "TFR FROM 1 TFR", None, Some(0)),
        ];
        let c = Classifier::new("1").unwrap();
        let sums = monthly_sums(&rows, |r| c.is_repayment(&r.description));
        assert_eq!(sums[&ym(2024, 1)], Decimal::from(1500));
        assert!(!sums.contains_key(&ym(2024, 2)));
        assert_eq!(sums[&ym(2024, 3)], Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_interest_saved_rejected() {
        let rows = vec![
            row(2024, 2, 1, "saved $10.00", None, None),
            row(2024, 2, 28, "saved $12.50", None, None),
        ];
        let c = Classifier::new("1").unwrap();
        let err = interest_saved_by_month(&rows, &c, DuplicatePolicy::Reject).unwrap_err();
        match err {
            HomeloanError::ClassificationAmbiguity { month, values } => {
                assert_eq!(month, ym(2024, 2));
                assert_eq!(values, vec![Decimal::new(1000, 2), Decimal::new(1250, 2)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_interest_saved_keep_last() {
        let rows = vec![
            row(2024, 2, 28, "saved $12.50", None, None),
            row(2024, 2, 1, "saved $10.00", None, None),
        ];
        let c = Classifier::new("1").unwrap();
        let saved = interest_saved_by_month(&rows, &c, DuplicatePolicy::KeepLast).unwrap();
        assert_eq!(saved[&ym(2024, 2)], Decimal::new(1250, 2));
    }

    #[test]
    fn test_aggregate_mortgage_fills_entries() {
        let rows = vec![
            row(2024, 1, 15, "TFR FROM 12345 TFR", Some(2000), Some(-298000)),
            row(2024, 1, 31, "Loan Interest - saved $45.67", Some(-1500), Some(-299500)),
            row(2024, 2, 15, "TFR FROM 12345 TFR", Some(2000), Some(-297500)),
        ];
        let c = Classifier::new("12345").unwrap();
        let ledger = aggregate_mortgage(&rows, &c, DuplicatePolicy::Reject).unwrap();

        let jan = ledger.get(&ym(2024, 1)).unwrap();
        assert_eq!(jan.repayment_sum, Some(Decimal::from(2000)));
        assert_eq!(jan.interest_sum, Some(Decimal::from(-1500)));
        assert_eq!(jan.interest_saved, Some(Decimal::new(4567, 2)));
        assert_eq!(jan.last_balance, Some(Decimal::from(-299500)));

        let feb = ledger.get(&ym(2024, 2)).unwrap();
        assert_eq!(feb.interest_sum, None);
        assert_eq!(feb.interest_saved, None);
    }

    #[test]
    fn test_aggregate_offset_empty() {
        assert!(aggregate_offset(&[]).is_empty());
    }
}
