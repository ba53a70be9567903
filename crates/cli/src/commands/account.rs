//! Account commands

use anyhow::{anyhow, Result};
use minibank_business::{AccountController, CustomerController, OpenAccount};
use minibank_core::{format_cents, AccountType};
use std::io::{BufRead, Write};

use crate::session::Session;

/// Open an account for an existing customer
pub fn open<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let national_id = session.console.ask("Owner CPF")?;
    let owner = CustomerController::new(&mut session.bank).require(&national_id)?;

    session
        .console
        .say("Account type: 1) Checking  2) Savings  3) Payroll")?;
    let answer = session.console.ask("Type")?;
    let account_type = match answer.as_str() {
        "1" => Some(AccountType::Checking),
        "2" => Some(AccountType::Savings),
        "3" => Some(AccountType::Payroll),
        other => AccountType::from_str(other),
    }
    .ok_or_else(|| anyhow!("Unknown account type: {:?}", answer))?;

    let kind = match account_type {
        AccountType::Checking => session.config.checking(),
        AccountType::Savings => session.config.savings(),
        AccountType::Payroll => {
            let employer = session.console.ask("Employer")?;
            session.config.payroll(&employer)
        }
    };

    let branch: u16 = session.console.ask_number("Branch")?;
    let number: u32 = session.console.ask_number("Account number")?;
    let pin = session.console.ask("PIN (4+ digits)")?;
    let initial_balance = session
        .console
        .ask_amount_or_zero("Initial balance (blank for 0)")?;
    let label = session.console.ask_optional("Label (optional)")?;

    let mut request =
        OpenAccount::new(branch, number, kind, &pin).with_initial_balance(initial_balance);
    if !label.is_empty() {
        request = request.with_label(&label);
    }

    let id = AccountController::new(&mut session.bank).open(owner, request)?;
    if let Some(account) = session.bank.account(id) {
        session.console.say(format!("✅ Opened {}", account))?;
    }
    Ok(())
}

pub fn deposit<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let id = session.select_account("Account")?;
    let amount = session.console.ask_amount("Amount")?;

    let receipt = AccountController::new(&mut session.bank).deposit(id, amount)?;
    session.console.say(format!("✅ {}", receipt))
}

/// Deposit by a named third party; payroll accounts accept only their employer
pub fn employer_deposit<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let id = session.select_account("Account")?;
    let depositor = session.console.ask("Depositor (employer name)")?;
    let amount = session.console.ask_amount("Amount")?;

    let receipt =
        AccountController::new(&mut session.bank).deposit_from(id, amount, &depositor)?;
    session.console.say(format!("✅ {}", receipt))
}

pub fn withdraw<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let id = session.authenticate("Account")?;
    let amount = session.console.ask_amount("Amount")?;

    let receipt = AccountController::new(&mut session.bank).withdraw(id, amount)?;
    session.console.say(format!("✅ {}", receipt))?;
    if let Some(remaining) = session
        .bank
        .account(id)
        .and_then(|a| a.withdrawals_remaining())
    {
        session
            .console
            .say(format!("   Withdrawals left this month: {}", remaining))?;
    }
    Ok(())
}

pub fn transfer<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let from = session.authenticate("Source")?;
    let to = session.select_account("Destination")?;
    let amount = session.console.ask_amount("Amount")?;

    let receipt = AccountController::new(&mut session.bank).transfer(from, to, amount)?;
    session.console.say(format!("✅ {}", receipt))
}

/// Print the ledger of one account
pub fn statement<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let id = session.authenticate("Account")?;

    let accounts = AccountController::new(&mut session.bank);
    let account = accounts.get(id)?;
    let entries = accounts.statement(id)?;
    let console = &mut session.console;

    console.say(format!("📄 Statement for {}", account))?;
    if entries.is_empty() {
        console.say("   No transactions.")?;
    }
    for entry in entries {
        let sign = if entry.kind().is_credit() { "+" } else { "-" };
        console.say(format!(
            "   {}  {:<16} {:>12}  {}",
            entry.timestamp().format("%Y-%m-%d %H:%M"),
            entry.kind().label(),
            format!("{}{}", sign, format_cents(entry.amount())),
            entry.description()
        ))?;
    }
    console.say(format!("   Balance: {}", format_cents(account.balance())))
}

/// List accounts with their owners
pub fn list<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let accounts = AccountController::new(&mut session.bank);
    let rows = accounts.list();
    let console = &mut session.console;

    if rows.is_empty() {
        return console.say("No accounts opened.");
    }

    console.say(format!(
        "{:<14} {:<9} {:<24} {:>14}  {}",
        "Account", "Type", "Label", "Balance", "Owner"
    ))?;
    console.say("-".repeat(80))?;
    for (_, account) in &rows {
        console.say(format!(
            "{:<14} {:<9} {:<24} {:>14}  {}",
            account.key().to_string(),
            account.account_type().label(),
            account.label(),
            format_cents(account.balance()),
            account.owner()
        ))?;
    }
    console.say(format!("{} accounts", rows.len()))
}

/// Apply fees, interest and payroll resets to every account
pub fn close_month<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let report = AccountController::new(&mut session.bank).close_month();
    let console = &mut session.console;

    console.say(format!("📅 Month closed: {}", report))?;
    for (key, fee) in &report.fees_charged {
        console.say(format!("   {}  fee      -{}", key, format_cents(*fee)))?;
    }
    for (key, interest) in &report.interest_paid {
        console.say(format!("   {}  interest +{}", key, format_cents(*interest)))?;
    }
    for (key, err) in &report.failures {
        console.say(format!("   ⚠️  {}  {}", key, err))?;
    }
    Ok(())
}
