//! Budget line items (income, expenses, bills) and recurring-frequency
//! normalization to a monthly amount.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HomeloanError;

/// How often a budget line item recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Fortnightly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    /// Occurrences per month. These are the approximations the budget views
    /// have always used, not exact calendar factors.
    pub fn monthly_factor(&self) -> Decimal {
        match self {
            Frequency::Weekly => Decimal::new(433, 2),
            Frequency::Fortnightly => Decimal::from(2),
            Frequency::Monthly => Decimal::ONE,
            Frequency::Quarterly => Decimal::new(33, 2),
            Frequency::Yearly => Decimal::ONE / Decimal::from(12),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Fortnightly => "Fortnightly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = HomeloanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Frequency::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| HomeloanError::InvalidFrequency {
                value: s.to_string(),
            })
    }
}

/// Monthly equivalent of a recurring amount.
pub fn monthly_equivalent(amount: Decimal, frequency: Frequency) -> Decimal {
    amount * frequency.monthly_factor()
}

/// Which budget table a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Income,
    Expenses,
    Bills,
}

impl BudgetKind {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetKind::Income => "Income",
            BudgetKind::Expenses => "Expenses",
            BudgetKind::Bills => "Bills",
        }
    }

    /// Default file name inside the data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            BudgetKind::Income => "income.csv",
            BudgetKind::Expenses => "expenses.csv",
            BudgetKind::Bills => "bills.csv",
        }
    }
}

/// One user-entered income, expense or bill row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLineItem {
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub frequency: Frequency,
}

impl BudgetLineItem {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
            frequency,
        }
    }

    pub fn monthly_amount(&self) -> Decimal {
        monthly_equivalent(self.amount, self.frequency)
    }
}
