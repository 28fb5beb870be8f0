//! Flat CSV storage for the income, expenses and bills tables.
//!
//! Files have the header `Name,Amount,Category,Frequency`. A table is read in
//! full when opened and written back in full only when saved; edits in
//! between live in memory.

use std::path::Path;

use homeloan_core::{BudgetKind, BudgetLineItem, Frequency, HomeloanError, Result};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Deserialize;

pub const BUDGET_COLUMNS: [&str; 4] = ["Name", "Amount", "Category", "Frequency"];

/// One editable grid row. Blank cells are allowed until the row is filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetRow {
    pub name: String,
    pub amount: Option<Decimal>,
    pub category: String,
    pub frequency: Option<Frequency>,
}

impl BudgetRow {
    /// The line item this row describes, if amount and frequency are set.
    pub fn to_item(&self) -> Option<BudgetLineItem> {
        Some(BudgetLineItem::new(
            self.name.clone(),
            self.amount?,
            self.category.clone(),
            self.frequency?,
        ))
    }
}

impl From<BudgetLineItem> for BudgetRow {
    fn from(item: BudgetLineItem) -> Self {
        Self {
            name: item.name,
            amount: Some(item.amount),
            category: item.category,
            frequency: Some(item.frequency),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Amount", default)]
    amount: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Frequency", default)]
    frequency: Option<String>,
}

/// In-memory copy of one budget file.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTable {
    pub kind: BudgetKind,
    pub rows: Vec<BudgetRow>,
}

impl BudgetTable {
    pub fn new(kind: BudgetKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// Read a budget file. A missing file is an empty table.
    pub fn load(kind: BudgetKind, path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("{} file {} not found; starting empty", kind.label(), path.display());
            return Ok(Self::new(kind));
        }

        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let mut rows = Vec::new();
        for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let raw = result?;
            // header is line 1
            rows.push(parse_row(raw, path, i as u64 + 2)?);
        }
        debug!("{}: loaded {} rows from {}", kind.label(), rows.len(), path.display());
        Ok(Self { kind, rows })
    }

    /// Overwrite `path` with every row, placeholders included.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(BUDGET_COLUMNS)?;
        for row in &self.rows {
            let amount = row.amount.map(|a| a.to_string()).unwrap_or_default();
            wtr.write_record([
                row.name.as_str(),
                amount.as_str(),
                row.category.as_str(),
                row.frequency.map(|f| f.label()).unwrap_or(""),
            ])?;
        }
        wtr.flush()?;
        info!("saved {} {} rows to {}", self.rows.len(), self.kind.label(), path.display());
        Ok(())
    }

    /// Append an empty placeholder row, like the grid's "+" button.
    pub fn add_row(&mut self) -> &mut BudgetRow {
        self.rows.push(BudgetRow::default());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn push(&mut self, item: BudgetLineItem) {
        self.rows.push(item.into());
    }

    /// Remove every row with this name (case-insensitive). Returns how many went.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| !r.name.trim().eq_ignore_ascii_case(name.trim()));
        before - self.rows.len()
    }

    /// Complete rows only; placeholders are skipped.
    pub fn items(&self) -> Vec<BudgetLineItem> {
        self.rows.iter().filter_map(BudgetRow::to_item).collect()
    }
}

/// Complete line items from a budget file; a missing file gives an empty list.
pub fn load_items(kind: BudgetKind, path: &Path) -> Result<Vec<BudgetLineItem>> {
    Ok(BudgetTable::load(kind, path)?.items())
}

pub fn save_items(kind: BudgetKind, path: &Path, items: &[BudgetLineItem]) -> Result<()> {
    let mut table = BudgetTable::new(kind);
    for item in items {
        table.push(item.clone());
    }
    table.save(path)
}

fn parse_row(raw: CsvRow, path: &Path, line: u64) -> Result<BudgetRow> {
    let amount = match raw.amount.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(s) => Some(s.replace(',', "").parse::<Decimal>().map_err(|_| {
            HomeloanError::AmountParse {
                path: path.to_path_buf(),
                line,
                column: "Amount",
                value: s.to_string(),
            }
        })?),
    };
    let frequency = match raw.frequency.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(s) => Some(s.parse::<Frequency>()?),
    };
    Ok(BudgetRow {
        name: raw.name.unwrap_or_default().trim().to_string(),
        amount,
        category: raw.category.unwrap_or_default().trim().to_string(),
        frequency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("homeloan-budget-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("bills.csv")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = scratch("missing");
        let table = BudgetTable::load(BudgetKind::Bills, &path).unwrap();
        assert!(table.rows.is_empty());
        assert!(table.items().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_rows() {
        let path = scratch("save");
        let mut table = BudgetTable::new(BudgetKind::Bills);
        table.push(BudgetLineItem::new("Power", Decimal::new(18050, 2), "Utilities", Frequency::Quarterly));
        table.add_row();
        table.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Name,Amount,Category,Frequency\nPower,180.50,Utilities,Quarterly\n,,,\n");

        let loaded = BudgetTable::load(BudgetKind::Bills, &path).unwrap();
        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.items().len(), 1);
        assert_eq!(loaded.items()[0].frequency, Frequency::Quarterly);
    }

    #[test]
    fn test_unknown_frequency_is_error() {
        let path = scratch("badfreq");
        fs::write(&path, "Name,Amount,Category,Frequency\nGym,20,Health,Daily\n").unwrap();
        let err = BudgetTable::load(BudgetKind::Bills, &path).unwrap_err();
        assert!(matches!(err, HomeloanError::InvalidFrequency { .. }));
    }

    #[test]
    fn test_bad_amount_reports_line() {
        let path = scratch("badamount");
        fs::write(&path, "Name,Amount,Category,Frequency\nGym,20,Health,Weekly\nRent,lots,Home,Monthly\n").unwrap();
        let err = BudgetTable::load(BudgetKind::Bills, &path).unwrap_err();
        assert!(matches!(err, HomeloanError::AmountParse { line: 3, .. }));
    }

    #[test]
    fn test_missing_category_column() {
        let path = scratch("nocat");
        fs::write(&path, "Name,Amount,Frequency\nSalary,5000,Monthly\n").unwrap();
        let table = BudgetTable::load(BudgetKind::Income, &path).unwrap();
        assert_eq!(table.items()[0].category, "");
    }

    #[test]
    fn test_save_items_drops_placeholders() {
        let path = scratch("items");
        let items = vec![BudgetLineItem::new("Rent", Decimal::from(1800), "Home", Frequency::Monthly)];
        save_items(BudgetKind::Bills, &path, &items).unwrap();
        assert_eq!(load_items(BudgetKind::Bills, &path).unwrap(), items);
    }

    #[test]
    fn test_remove_named() {
        let mut table = BudgetTable::new(BudgetKind::Expenses);
        table.push(BudgetLineItem::new("Coffee", Decimal::from(5), "Food", Frequency::Weekly));
        table.push(BudgetLineItem::new("Books", Decimal::from(30), "Leisure", Frequency::Monthly));
        assert_eq!(table.remove_named("coffee"), 1);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.remove_named("nothing"), 0);
    }
}
