//! Minibank CLI - interactive banking console
//!
//! Usage:
//! ```bash
//! minibank
//! minibank --data-dir /tmp/minibank --log-level debug
//! MINIBANK_INTEREST_RATE=0.01 minibank --no-autosave
//! minibank --fresh
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use minibank_business::config::DEFAULT_PAYROLL_LIMIT;
use minibank_business::{load_bank, BankConfig};
use minibank_core::Bank;
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod session;

use console::Console;
use session::Session;

/// Minibank - customers, accounts and transactions from a console menu
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the CSV snapshot
    #[arg(long, env = "MINIBANK_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Monthly fee for new checking accounts
    #[arg(long, env = "MINIBANK_MAINTENANCE_FEE", default_value = "12.50")]
    pub maintenance_fee: Decimal,

    /// Monthly rate for new savings accounts, as a fraction (0.005 = 0.5%)
    #[arg(long, env = "MINIBANK_INTEREST_RATE", default_value = "0.005")]
    pub interest_rate: Decimal,

    /// Monthly withdrawal limit for new payroll accounts
    #[arg(long, env = "MINIBANK_PAYROLL_LIMIT", default_value_t = DEFAULT_PAYROLL_LIMIT)]
    pub payroll_limit: u32,

    /// Log filter used when RUST_LOG is not set (e.g. info, minibank_business=debug)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Do not save the snapshot on exit
    #[arg(long)]
    pub no_autosave: bool,

    /// Start with an empty bank instead of loading the snapshot
    #[arg(long)]
    pub fresh: bool,
}

impl Cli {
    pub fn config(&self) -> BankConfig {
        BankConfig::new()
            .with_data_dir(&self.data_dir)
            .with_maintenance_fee(self.maintenance_fee)
            .with_interest_rate(self.interest_rate)
            .with_payroll_limit(self.payroll_limit)
            .with_autosave(!self.no_autosave)
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = cli.config();
    let bank = if cli.fresh {
        Bank::new()
    } else {
        let (bank, report) = load_bank(&config).with_context(|| {
            format!("Failed to load snapshot from {}", config.data_dir.display())
        })?;
        if report.skipped() > 0 {
            warn!(skipped = report.skipped(), "Some CSV lines were skipped on load");
        }
        bank
    };
    info!(
        data_dir = %config.data_dir.display(),
        customers = bank.customer_count(),
        accounts = bank.account_count(),
        "Minibank started"
    );

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Session::new(config, bank, console).run()
}
