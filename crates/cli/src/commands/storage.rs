//! Snapshot save/load commands

use anyhow::{Context, Result};
use minibank_business::{load_bank, save_bank};
use std::io::{BufRead, Write};

use crate::session::Session;

/// Write the CSV snapshot to the data directory
pub fn save<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let dir = session.config.data_dir.display().to_string();
    let report = save_bank(&session.config, &session.bank)
        .with_context(|| format!("Failed to save to {}", dir))?;

    session.console.say(format!(
        "💾 Saved {} customers, {} accounts, {} ledger entries to {}",
        report.customers, report.accounts, report.entries, dir
    ))
}

/// Replace the in-memory bank with the snapshot on disk
pub fn load<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let dir = session.config.data_dir.display().to_string();
    let (bank, report) =
        load_bank(&session.config).with_context(|| format!("Failed to load from {}", dir))?;
    session.bank = bank;

    session.console.say(format!(
        "📂 Loaded {} customers and {} accounts from {}",
        session.bank.customer_count(),
        session.bank.account_count(),
        dir
    ))?;
    if report.skipped() > 0 {
        session.console.say(format!(
            "   ⚠️  {} lines skipped (see log for details)",
            report.skipped()
        ))?;
    }
    Ok(())
}
