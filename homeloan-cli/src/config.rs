use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use homeloan_core::{DuplicatePolicy, StatementConfig};
use homeloan_finance::{BudgetPaths, StatementSources};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_homeloan_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountSection,
    #[serde(default)]
    pub statements: StatementsSection,
    #[serde(default)]
    pub budget: BudgetSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSection {
    /// Account the mortgage repayments are transferred from.
    #[serde(default)]
    pub number: String,
    /// Only transactions strictly after this date are used ("YYYY-MM-DD").
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementsSection {
    pub data_dir: PathBuf,
    pub offset_pattern: String,
    pub mortgage_pattern: String,
    #[serde(default = "default_true")]
    pub has_headers: bool,
    #[serde(default)]
    pub duplicate_interest_saved: DuplicatePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSection {
    pub income_file: PathBuf,
    pub expenses_file: PathBuf,
    pub bills_file: PathBuf,
    pub summary_file: PathBuf,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_true() -> bool {
    true
}

impl Default for AccountSection {
    fn default() -> Self {
        Self {
            number: String::new(),
            start_date: default_start_date(),
        }
    }
}

impl Default for StatementsSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            offset_pattern: "offset*".to_string(),
            mortgage_pattern: "mortgage*".to_string(),
            has_headers: true,
            duplicate_interest_saved: DuplicatePolicy::Reject,
        }
    }
}

impl Default for BudgetSection {
    fn default() -> Self {
        let paths = BudgetPaths::in_dir(Path::new("."));
        Self {
            income_file: paths.income,
            expenses_file: paths.expenses,
            bills_file: paths.bills,
            summary_file: paths.summary,
        }
    }
}

impl Config {
    pub fn statement_config(&self) -> Result<StatementConfig> {
        let number = self.account.number.trim();
        if number.is_empty() {
            bail!("account.number is not set (run `homeloan config init` and edit the file)");
        }
        Ok(StatementConfig::new(number, self.account.start_date)
            .with_headers(self.statements.has_headers)
            .with_duplicate_policy(self.statements.duplicate_interest_saved))
    }

    pub fn statement_sources(&self) -> StatementSources {
        StatementSources {
            dir: self.statements.data_dir.clone(),
            offset_pattern: self.statements.offset_pattern.clone(),
            mortgage_pattern: self.statements.mortgage_pattern.clone(),
        }
    }

    pub fn budget_paths(&self) -> BudgetPaths {
        BudgetPaths {
            income: self.budget.income_file.clone(),
            expenses: self.budget.expenses_file.clone(),
            bills: self.budget.bills_file.clone(),
            summary: self.budget.summary_file.clone(),
        }
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(ensure_homeloan_home()?.join("config.toml")),
    }
}

pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit)?;
    if !p.exists() {
        log::debug!("no config at {}; using defaults", p.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, explicit: Option<&Path>) -> Result<()> {
    let p = config_path(explicit)?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = config_path(explicit)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), explicit)?;
    println!("Wrote {}", p.display());
    println!("Set account.number and account.start_date before running `homeloan reconcile`.");
    Ok(())
}
