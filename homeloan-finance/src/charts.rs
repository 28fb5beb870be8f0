//! Chart-ready series: oldest month first, values rounded like the tables.

use chrono::NaiveDate;
use homeloan_ingest::TransactionRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reconcile::{MonthlySeries, ReconciledMonth};
use crate::table::round;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: &'static str,
    pub values: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: &'static str,
    /// Month labels, ascending.
    pub x: Vec<String>,
    pub traces: Vec<Trace>,
}

type Metric = fn(&ReconciledMonth) -> Option<Decimal>;

fn build(title: &'static str, series: &MonthlySeries, metrics: &[(&'static str, Metric)]) -> ChartSeries {
    let x = series.ascending().map(|r| r.month.to_string()).collect();
    let traces = metrics
        .iter()
        .map(|&(name, f)| Trace {
            name,
            values: series.ascending().map(|r| f(r).map(|v| round(v, 0))).collect(),
        })
        .collect();
    ChartSeries { title, x, traces }
}

/// Interest paid against interest saved per month.
pub fn interest_chart(series: &MonthlySeries) -> ChartSeries {
    build(
        "Month to Month Interest",
        series,
        &[
            ("Interest Paid", |r: &ReconciledMonth| Some(r.interest_sum())),
            ("Interest Saved", |r: &ReconciledMonth| Some(r.interest_saved)),
        ],
    )
}

/// Additional repayments against principal paid per month.
pub fn loan_chart(series: &MonthlySeries) -> ChartSeries {
    build(
        "Month to Month Principal",
        series,
        &[
            ("Additional Repayments", |r: &ReconciledMonth| r.additional_repayments),
            ("Principal Paid", |r: &ReconciledMonth| Some(r.principal_paid)),
        ],
    )
}

pub fn net_savings_chart(series: &MonthlySeries) -> ChartSeries {
    build(
        "Month to Month Savings",
        series,
        &[("Loan Balance Change", |r: &ReconciledMonth| r.change_in_remaining_loan_balance)],
    )
}

/// Offset balance after every transaction, in date order.
pub fn offset_balance_history(rows: &[TransactionRecord]) -> Vec<(NaiveDate, Decimal)> {
    let mut points: Vec<_> = rows
        .iter()
        .filter_map(|r| r.balance.map(|b| (r.transaction_date, b)))
        .collect();
    points.sort_by_key(|(date, _)| *date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{MonthlyEntry, MonthlyLedger};
    use crate::reconcile::reconcile;
    use homeloan_core::YearMonth;

    fn series() -> MonthlySeries {
        let mut offset = MonthlyLedger::default();
        let mut mortgage = MonthlyLedger::default();
        for (m, ob, mb) in [(1, 10000, -200000), (2, 10500, -199000)] {
            let month = YearMonth::new(2024, m).unwrap();
            offset.entries.insert(
                month,
                MonthlyEntry {
                    last_balance: Some(Decimal::from(ob)),
                    ..Default::default()
                },
            );
            mortgage.entries.insert(
                month,
                MonthlyEntry {
                    repayment_sum: Some(Decimal::from(1500)),
                    interest_sum: Some(Decimal::new(-80049, 2)),
                    interest_saved: Some(Decimal::new(3050, 2)),
                    last_balance: Some(Decimal::from(mb)),
                },
            );
        }
        reconcile(&offset, &mortgage).monthly
    }

    #[test]
    fn test_charts_are_ascending() {
        let chart = interest_chart(&series());
        assert_eq!(chart.x, vec!["2024-01", "2024-02"]);
        assert_eq!(chart.traces[0].values, vec![Some(Decimal::from(800)), Some(Decimal::from(800))]);
        assert_eq!(chart.traces[1].values[0], Some(Decimal::from(30)));
    }

    #[test]
    fn test_first_month_has_no_change() {
        let chart = net_savings_chart(&series());
        assert_eq!(chart.traces[0].values, vec![None, Some(Decimal::from(1500))]);
        let loan = loan_chart(&series());
        assert_eq!(loan.traces[0].values, vec![None, Some(Decimal::ZERO)]);
    }

    #[test]
    fn test_offset_history_sorted() {
        let mk = |d: u32, b: Option<i64>| {
            let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
            TransactionRecord {
                transaction_date: date,
                month: YearMonth::of(date),
                processed_date: String::new(),
                description: "x".into(),
                credit_amount: Some(Decimal::ONE),
                balance: b.map(Decimal::from),
            }
        };
        let rows = vec![mk(9, Some(2)), mk(3, Some(1)), mk(5, None)];
        let hist = offset_balance_history(&rows);
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].1, Decimal::ONE);
    }
}
