//! Customer commands

use anyhow::Result;
use minibank_business::CustomerController;
use std::io::{BufRead, Write};

use crate::session::Session;

/// Register a new customer
pub fn register<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let name = session.console.ask("Name")?;
    let national_id = session.console.ask("CPF (11 digits)")?;
    let email = session.console.ask_optional("Email (optional)")?;
    let phone = session.console.ask_optional("Phone (optional)")?;

    let id = CustomerController::new(&mut session.bank)
        .register(&name, &national_id, &email, &phone)?;

    if let Some(customer) = session.bank.customer(id) {
        session
            .console
            .say(format!("✅ Registered {} as {}", customer, id))?;
    }
    Ok(())
}

/// List customers
pub fn list<R: BufRead, W: Write>(session: &mut Session<R, W>) -> Result<()> {
    let customers = CustomerController::new(&mut session.bank);
    let rows = customers.list();
    let console = &mut session.console;

    if rows.is_empty() {
        return console.say("No customers registered.");
    }

    console.say(format!(
        "{:<10} {:<11} {:<28} {:<24} {:<16} {}",
        "ID", "CPF", "Name", "Email", "Phone", "Accounts"
    ))?;
    console.say("-".repeat(100))?;
    for (id, customer) in &rows {
        console.say(format!(
            "{:<10} {:<11} {:<28} {:<24} {:<16} {}",
            id.to_string(),
            customer.national_id(),
            customer.name,
            customer.email,
            customer.phone,
            customer.accounts().len()
        ))?;
    }
    console.say(format!("{} customers", rows.len()))
}
