//! Column-oriented result tables handed to the presentation layer.
//!
//! This is the only place values get rounded.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::reconcile::{LifetimeSummary, MonthlySeries, ReconciledMonth};

pub const MONTHLY_COLUMNS: [&str; 9] = [
    "Month",
    "Mortgage Balance",
    "Offset Balance",
    "Remaining Loan Balance",
    "Loan Balance Change",
    "Principal Paid",
    "Interest Paid",
    "Additional Repayments",
    "Interest Saved",
];

pub const SUMMARY_COLUMNS: [&str; 5] = [
    "Mortgage",
    "Offset",
    "Remaining Loan Amount",
    "Interest Saved",
    "Interest Paid",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// `None` renders as blank / JSON null.
    Number(Option<Decimal>),
}

impl Cell {
    pub fn number(value: Decimal, dp: u32) -> Self {
        Cell::Number(Some(round(value, dp)))
    }

    pub fn maybe_number(value: Option<Decimal>, dp: u32) -> Self {
        Cell::Number(value.map(|v| round(v, dp)))
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(_) => None,
        }
    }

    fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(Some(v)) => v.to_string(),
            Cell::Number(None) => String::new(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(None) => serializer.serialize_none(),
            Cell::Number(Some(v)) if v.scale() == 0 => match v.to_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.collect_str(v),
            },
            Cell::Number(Some(v)) => match v.to_f64() {
                Some(f) => serializer.serialize_f64(f),
                None => serializer.collect_str(v),
            },
        }
    }
}

/// Half-to-even rounding; negative zero is folded to zero.
pub fn round(value: Decimal, dp: u32) -> Decimal {
    let r = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    if r.is_zero() { Decimal::ZERO } else { r }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Ordered mapping of column name to values. Serializes as a JSON object
/// whose keys keep column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn with_columns(names: &[&str]) -> Self {
        Self {
            columns: names
                .iter()
                .map(|n| Column {
                    name: n.to_string(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// Append one row; `cells` must line up with the columns.
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        for (col, cell) in self.columns.iter_mut().zip(cells) {
            col.values.push(cell);
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    /// Plain-text rendering with right-aligned columns.
    pub fn render_text(&self) -> String {
        let rendered: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values.iter().map(Cell::render).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&rendered)
            .map(|(c, vals)| vals.iter().map(|v| v.len()).chain([c.name.len()]).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>w$}", c.name, w = w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in 0..self.row_count() {
            let line: Vec<String> = rendered
                .iter()
                .zip(&widths)
                .map(|(vals, w)| format!("{:>w$}", vals[row], w = w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for col in &self.columns {
            map.serialize_entry(&col.name, &col.values)?;
        }
        map.end()
    }
}

fn monthly_row(r: &ReconciledMonth) -> Vec<Cell> {
    vec![
        Cell::Text(r.month.to_string()),
        Cell::number(r.mortgage_balance(), 0),
        Cell::number(r.offset_balance, 0),
        Cell::number(r.remaining_loan_balance(), 0),
        Cell::maybe_number(r.change_in_remaining_loan_balance, 0),
        Cell::number(r.principal_paid, 0),
        Cell::number(r.interest_sum(), 0),
        Cell::maybe_number(r.additional_repayments, 0),
        Cell::number(r.interest_saved, 0),
    ]
}

/// Monthly view, most recent month first.
pub fn monthly_table(series: &MonthlySeries) -> Table {
    let mut table = Table::with_columns(&MONTHLY_COLUMNS);
    for r in series.descending() {
        table.push_row(monthly_row(r));
    }
    table
}

/// Single-row lifetime totals.
pub fn summary_table(summary: &LifetimeSummary) -> Table {
    let mut table = Table::with_columns(&SUMMARY_COLUMNS);
    table.push_row(vec![
        Cell::number(summary.mortgage_balance, 0),
        Cell::number(summary.offset_balance, 0),
        Cell::number(summary.remaining_loan_balance, 0),
        Cell::number(summary.interest_saved, 0),
        Cell::number(summary.interest_paid, 0),
    ]);
    table
}
