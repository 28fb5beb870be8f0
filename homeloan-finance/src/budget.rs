//! Monthly budget figures built from the income, expenses and bills tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use homeloan_core::{BudgetKind, BudgetLineItem, Result};
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::budget_store::BudgetTable;
use crate::table::{Cell, Table};

pub const SUMMARY_FILE_NAME: &str = "summary.csv";
pub const BUDGET_SUMMARY_COLUMNS: [&str; 2] = ["Category", "Monthly Amount"];

/// File locations of the three budget tables and the summary snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetPaths {
    pub income: PathBuf,
    pub expenses: PathBuf,
    pub bills: PathBuf,
    pub summary: PathBuf,
}

impl BudgetPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            income: dir.join(BudgetKind::Income.default_file_name()),
            expenses: dir.join(BudgetKind::Expenses.default_file_name()),
            bills: dir.join(BudgetKind::Bills.default_file_name()),
            summary: dir.join(SUMMARY_FILE_NAME),
        }
    }

    pub fn path(&self, kind: BudgetKind) -> &Path {
        match kind {
            BudgetKind::Income => &self.income,
            BudgetKind::Expenses => &self.expenses,
            BudgetKind::Bills => &self.bills,
        }
    }

    pub fn load(&self, kind: BudgetKind) -> Result<BudgetTable> {
        BudgetTable::load(kind, self.path(kind))
    }
}

/// Monthly totals across all three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total_income: Decimal,
    pub total_bills: Decimal,
    pub total_expenses: Decimal,
    pub remaining_income: Decimal,
}

pub fn monthly_total(items: &[BudgetLineItem]) -> Decimal {
    items.iter().map(BudgetLineItem::monthly_amount).sum()
}

impl BudgetSummary {
    /// Every table, income included, is normalized to a monthly amount. The
    /// dashboard this replaces summed raw income amounts regardless of
    /// frequency; that is deliberately not reproduced.
    pub fn compute(income: &[BudgetLineItem], expenses: &[BudgetLineItem], bills: &[BudgetLineItem]) -> Self {
        let total_income = monthly_total(income);
        let total_bills = monthly_total(bills);
        let total_expenses = monthly_total(expenses);
        Self {
            total_income,
            total_bills,
            total_expenses,
            remaining_income: total_income - total_bills - total_expenses,
        }
    }

    /// Read all three tables (missing files count as empty) and total them.
    pub fn load(paths: &BudgetPaths) -> Result<Self> {
        let income = paths.load(BudgetKind::Income)?.items();
        let expenses = paths.load(BudgetKind::Expenses)?.items();
        let bills = paths.load(BudgetKind::Bills)?.items();
        Ok(Self::compute(&income, &expenses, &bills))
    }

    pub fn entries(&self) -> [(&'static str, Decimal); 4] {
        [
            ("Total Income", self.total_income),
            ("Total Bills", self.total_bills),
            ("Total Expenses", self.total_expenses),
            ("Remaining Income", self.remaining_income),
        ]
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::with_columns(&BUDGET_SUMMARY_COLUMNS);
        for (label, amount) in self.entries() {
            table.push_row(vec![Cell::Text(label.to_string()), Cell::number(amount, 2)]);
        }
        table
    }

    /// Overwrite the summary snapshot file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(BUDGET_SUMMARY_COLUMNS)?;
        for (label, amount) in self.entries() {
            let amount = amount.round_dp(2).to_string();
            wtr.write_record([label, amount.as_str()])?;
        }
        wtr.flush()?;
        info!("wrote budget summary to {}", path.display());
        Ok(())
    }
}

/// Monthly amount per line item, in table order (the income view).
pub fn breakdown_by_name(items: &[BudgetLineItem]) -> Vec<(String, Decimal)> {
    items
        .iter()
        .map(|i| (i.name.clone(), i.monthly_amount()))
        .collect()
}

/// Monthly amount summed per category, ordered by category (bills and
/// expenses views).
pub fn breakdown_by_category(items: &[BudgetLineItem]) -> Vec<(String, Decimal)> {
    let mut by_cat: BTreeMap<String, Decimal> = BTreeMap::new();
    for i in items {
        *by_cat.entry(i.category.clone()).or_default() += i.monthly_amount();
    }
    by_cat.into_iter().collect()
}

/// Summary entries without the income line, as shown in the overview chart.
pub fn outgoing_breakdown(summary: &BudgetSummary) -> Vec<(String, Decimal)> {
    summary
        .entries()
        .into_iter()
        .skip(1)
        .map(|(label, amount)| (label.to_string(), amount))
        .collect()
}
