use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use homeloan_core::{BudgetKind, BudgetLineItem, Frequency};
use homeloan_finance::budget::outgoing_breakdown;
use homeloan_finance::{
    BudgetPaths, BudgetSummary, BudgetTable, Cell, Table, breakdown_by_category, breakdown_by_name,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Income,
    Expenses,
    Bills,
}

impl From<KindArg> for BudgetKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Income => BudgetKind::Income,
            KindArg::Expenses => BudgetKind::Expenses,
            KindArg::Bills => BudgetKind::Bills,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    /// Print one budget table with monthly equivalents and its breakdown
    Show {
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Append a line item and save the table
    Add {
        #[arg(value_enum)]
        kind: KindArg,

        #[arg(long)]
        name: String,

        #[arg(long)]
        amount: Decimal,

        #[arg(long, default_value = "")]
        category: String,

        /// Weekly, Fortnightly, Monthly, Quarterly or Yearly
        #[arg(long)]
        frequency: Frequency,
    },

    /// Remove every row with the given name and save the table
    Remove {
        #[arg(value_enum)]
        kind: KindArg,

        #[arg(long)]
        name: String,
    },

    /// Compute monthly totals and write the summary file
    Summary,
}

pub fn run(cmd: BudgetCommand, paths: &BudgetPaths) -> Result<()> {
    match cmd {
        BudgetCommand::Show { kind } => show(kind.into(), paths),
        BudgetCommand::Add {
            kind,
            name,
            amount,
            category,
            frequency,
        } => {
            let kind: BudgetKind = kind.into();
            let mut table = load(kind, paths)?;
            table.push(BudgetLineItem::new(name.trim(), amount, category.trim(), frequency));
            save(&table, paths)?;
            println!("Added {} to {} ({} rows)", name.trim(), kind.label(), table.rows.len());
            Ok(())
        }
        BudgetCommand::Remove { kind, name } => {
            let kind: BudgetKind = kind.into();
            let mut table = load(kind, paths)?;
            let removed = table.remove_named(&name);
            if removed == 0 {
                bail!("no {} row named {:?}", kind.label(), name);
            }
            save(&table, paths)?;
            println!("Removed {} row(s) from {}", removed, kind.label());
            Ok(())
        }
        BudgetCommand::Summary => summary(paths),
    }
}

fn load(kind: BudgetKind, paths: &BudgetPaths) -> Result<BudgetTable> {
    let p = paths.path(kind);
    paths.load(kind).with_context(|| format!("reading {}", p.display()))
}

fn save(table: &BudgetTable, paths: &BudgetPaths) -> Result<()> {
    let p = paths.path(table.kind);
    table.save(p).with_context(|| format!("writing {}", p.display()))
}

fn show(kind: BudgetKind, paths: &BudgetPaths) -> Result<()> {
    let table = load(kind, paths)?;
    println!("# {} ({})\n", kind.label(), paths.path(kind).display());

    let mut grid = Table::with_columns(&["Name", "Amount", "Category", "Frequency", "Monthly"]);
    for row in &table.rows {
        grid.push_row(vec![
            Cell::Text(row.name.clone()),
            Cell::maybe_number(row.amount, 2),
            Cell::Text(row.category.clone()),
            Cell::Text(row.frequency.map(|f| f.label()).unwrap_or("").to_string()),
            Cell::maybe_number(row.to_item().map(|i| i.monthly_amount()), 2),
        ]);
    }
    print!("{}", grid.render_text());

    let items = table.items();
    let (label, breakdown) = match kind {
        BudgetKind::Income => ("Name", breakdown_by_name(&items)),
        BudgetKind::Expenses | BudgetKind::Bills => ("Category", breakdown_by_category(&items)),
    };
    println!("\n## Monthly by {}\n", label.to_lowercase());
    print!("{}", pairs_table(label, &breakdown).render_text());
    Ok(())
}

fn summary(paths: &BudgetPaths) -> Result<()> {
    let summary = BudgetSummary::load(paths).context("loading budget tables")?;
    summary
        .write_csv(&paths.summary)
        .with_context(|| format!("writing {}", paths.summary.display()))?;

    print!("{}", summary.to_table().render_text());
    println!("\n## Where it goes\n");
    print!("{}", pairs_table("Category", &outgoing_breakdown(&summary)).render_text());
    println!("\nWrote {}", paths.summary.display());
    Ok(())
}

fn pairs_table(label: &str, pairs: &[(String, Decimal)]) -> Table {
    let mut t = Table::with_columns(&[label, "Monthly Amount"]);
    for (name, amount) in pairs {
        t.push_row(vec![Cell::Text(name.clone()), Cell::number(*amount, 2)]);
    }
    t
}
