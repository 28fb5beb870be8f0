//! Join the offset and mortgage ledgers month by month and derive the loan
//! metrics shown on the dashboard.
//!
//! A month is kept only when all five components are present: both balances,
//! a repayment sum, an interest sum and an interest-saved annotation. Months
//! missing any of them are reported in `dropped_months` and logged.
//!
//! Mortgage balances and interest charges are negative in the exports. The
//! signed values are kept for the arithmetic; the unsigned fields are the
//! magnitudes used for display.

use std::collections::BTreeSet;

use homeloan_core::YearMonth;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::MonthlyLedger;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledMonth {
    pub month: YearMonth,
    pub offset_balance: Decimal,
    pub mortgage_balance_signed: Decimal,
    pub remaining_loan_balance_signed: Decimal,
    /// Change in the signed remaining balance since the previous reconciled
    /// month; `None` for the first one.
    pub change_in_remaining_loan_balance: Option<Decimal>,
    pub repayment_sum: Decimal,
    pub interest_sum_signed: Decimal,
    pub interest_saved: Decimal,
    pub principal_paid: Decimal,
    /// Follows `change_in_remaining_loan_balance`.
    pub additional_repayments: Option<Decimal>,
}

impl ReconciledMonth {
    pub fn mortgage_balance(&self) -> Decimal {
        self.mortgage_balance_signed.abs()
    }

    pub fn remaining_loan_balance(&self) -> Decimal {
        self.remaining_loan_balance_signed.abs()
    }

    pub fn interest_sum(&self) -> Decimal {
        self.interest_sum_signed.abs()
    }
}

/// Reconciled months, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    rows: Vec<ReconciledMonth>,
}

impl MonthlySeries {
    /// Build from rows in ascending month order.
    fn from_ascending(mut rows: Vec<ReconciledMonth>) -> Self {
        rows.reverse();
        Self { rows }
    }

    /// Most recent month first, for tables.
    pub fn descending(&self) -> &[ReconciledMonth] {
        &self.rows
    }

    /// Oldest month first, for chart axes.
    pub fn ascending(&self) -> impl DoubleEndedIterator<Item = &ReconciledMonth> {
        self.rows.iter().rev()
    }

    pub fn latest(&self) -> Option<&ReconciledMonth> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Totals as of the most recent reconciled month. All zero when nothing
/// reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LifetimeSummary {
    pub mortgage_balance: Decimal,
    pub offset_balance: Decimal,
    pub remaining_loan_balance: Decimal,
    pub interest_saved: Decimal,
    pub interest_paid: Decimal,
}

impl LifetimeSummary {
    pub fn from_series(series: &MonthlySeries) -> Self {
        let Some(latest) = series.latest() else {
            return Self::default();
        };
        Self {
            mortgage_balance: latest.mortgage_balance(),
            offset_balance: latest.offset_balance,
            remaining_loan_balance: latest.remaining_loan_balance(),
            interest_saved: series.descending().iter().map(|r| r.interest_saved).sum(),
            interest_paid: series.descending().iter().map(|r| r.interest_sum()).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub monthly: MonthlySeries,
    pub summary: LifetimeSummary,
    /// Months seen in some component but missing from at least one other.
    pub dropped_months: Vec<YearMonth>,
}

struct Joined {
    month: YearMonth,
    offset_balance: Decimal,
    mortgage_balance: Decimal,
    repayment: Decimal,
    interest: Decimal,
    interest_saved: Decimal,
}

/// Inner-join both ledgers on month and derive the per-month metrics.
pub fn reconcile(offset: &MonthlyLedger, mortgage: &MonthlyLedger) -> Reconciliation {
    let all_months: BTreeSet<YearMonth> = offset.months().chain(mortgage.months()).copied().collect();

    let mut joined = Vec::new();
    let mut dropped_months = Vec::new();

    for month in all_months {
        let o = offset.get(&month).copied().unwrap_or_default();
        let m = mortgage.get(&month).copied().unwrap_or_default();
        match (
            o.last_balance,
            m.last_balance,
            m.repayment_sum,
            m.interest_sum,
            m.interest_saved,
        ) {
            (Some(ob), Some(mb), Some(rep), Some(int), Some(saved)) => joined.push(Joined {
                month,
                offset_balance: ob,
                mortgage_balance: mb,
                repayment: rep,
                interest: int,
                interest_saved: saved,
            }),
            _ => dropped_months.push(month),
        }
    }

    if !dropped_months.is_empty() {
        let listed: Vec<String> = dropped_months.iter().map(|m| m.to_string()).collect();
        warn!(
            "{} month(s) dropped for missing balance, repayment, interest or interest-saved data: {}",
            dropped_months.len(),
            listed.join(", ")
        );
    }

    let rows = derive_rows(joined);
    info!("reconciled {} month(s)", rows.len());

    let monthly = MonthlySeries::from_ascending(rows);
    let summary = LifetimeSummary::from_series(&monthly);
    Reconciliation {
        monthly,
        summary,
        dropped_months,
    }
}

fn derive_rows(joined: Vec<Joined>) -> Vec<ReconciledMonth> {
    let mut rows = Vec::with_capacity(joined.len());
    let mut previous_remaining: Option<Decimal> = None;

    for j in joined {
        let remaining = j.offset_balance + j.mortgage_balance;
        let change = previous_remaining.map(|prev| remaining - prev);
        previous_remaining = Some(remaining);

        rows.push(ReconciledMonth {
            month: j.month,
            offset_balance: j.offset_balance,
            mortgage_balance_signed: j.mortgage_balance,
            remaining_loan_balance_signed: remaining,
            change_in_remaining_loan_balance: change,
            repayment_sum: j.repayment,
            interest_sum_signed: j.interest,
            interest_saved: j.interest_saved,
            // interest is negative, so this is repayment less the interest charged
            principal_paid: j.repayment + j.interest,
            additional_repayments: change.map(|c| c - j.repayment),
        });
    }
    rows
}
