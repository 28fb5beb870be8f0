use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use homeloan_core::YearMonth;
use homeloan_finance::charts::{
    ChartSeries, interest_chart, loan_chart, net_savings_chart, offset_balance_history,
};
use homeloan_finance::{
    Cell, Reconciliation, Table, load_accounts, monthly_table, process_statements, summary_table,
};
use serde::Serialize;
use std::path::PathBuf;

mod budget_cmd;
mod config;
mod state;

use budget_cmd::BudgetCommand;
use config::{init_config, load_config};

#[derive(Parser, Debug)]
#[command(name = "homeloan", version, about = "Mortgage and offset account tracker")]
struct Cli {
    /// Config file (default: ~/.homeloan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile offset and mortgage exports month by month
    Reconcile {
        /// Print tables and chart series as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Offset balance after every transaction
    OffsetHistory {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Income, expenses and bills tables
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config_file = cli.config.as_deref();

    match cli.command {
        Command::Reconcile { json } => {
            let cfg = load_config(config_file)?;
            let sources = cfg.statement_sources();
            let rec = process_statements(&sources, &cfg.statement_config()?)
                .with_context(|| format!("processing statements in {}", sources.dir.display()))?;
            if json {
                print_reconciliation_json(&rec)?;
            } else {
                print_reconciliation(&rec);
            }
        }

        Command::OffsetHistory { json } => {
            let cfg = load_config(config_file)?;
            let sources = cfg.statement_sources();
            let rows = load_accounts(&sources, &cfg.statement_config()?)
                .with_context(|| format!("loading statements in {}", sources.dir.display()))?;
            let history = offset_balance_history(&rows.offset);

            let mut table = Table::with_columns(&["Date", "Balance"]);
            for (date, balance) in &history {
                table.push_row(vec![Cell::Text(date.to_string()), Cell::number(*balance, 2)]);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", table.render_text());
            }
        }

        Command::Budget { command } => {
            let cfg = load_config(config_file)?;
            budget_cmd::run(command, &cfg.budget_paths())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config(config_file)?,
            ConfigCommand::Show => {
                let cfg = load_config(config_file)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn print_reconciliation(rec: &Reconciliation) {
    println!("# Lifetime\n");
    print!("{}", summary_table(&rec.summary).render_text());

    println!("\n# Month to month\n");
    if rec.monthly.is_empty() {
        println!("(no reconciled months)");
    } else {
        print!("{}", monthly_table(&rec.monthly).render_text());
    }

    if !rec.dropped_months.is_empty() {
        let months: Vec<String> = rec.dropped_months.iter().map(|m| m.to_string()).collect();
        println!("\nIncomplete months left out: {}", months.join(", "));
    }
}

#[derive(Serialize)]
struct ReconcileReport<'a> {
    summary: Table,
    monthly: Table,
    charts: [ChartSeries; 3],
    dropped_months: &'a [YearMonth],
}

fn print_reconciliation_json(rec: &Reconciliation) -> Result<()> {
    let report = ReconcileReport {
        summary: summary_table(&rec.summary),
        monthly: monthly_table(&rec.monthly),
        charts: [
            interest_chart(&rec.monthly),
            loan_chart(&rec.monthly),
            net_savings_chart(&rec.monthly),
        ],
        dropped_months: &rec.dropped_months,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
