//! Interactive session - menu loop over a console

use crate::commands::{account, customer, storage};
use crate::console::Console;
use anyhow::{anyhow, bail, Result};
use minibank_business::{BankConfig, BusinessError};
use minibank_core::{format_cents, AccountId, Bank, CoreError};
use std::io::{BufRead, Write};
use tracing::debug;

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterCustomer,
    OpenAccount,
    Deposit,
    EmployerDeposit,
    Withdraw,
    Transfer,
    Statement,
    ListCustomers,
    ListAccounts,
    MonthEnd,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 13] = [
        MenuChoice::RegisterCustomer,
        MenuChoice::OpenAccount,
        MenuChoice::Deposit,
        MenuChoice::EmployerDeposit,
        MenuChoice::Withdraw,
        MenuChoice::Transfer,
        MenuChoice::Statement,
        MenuChoice::ListCustomers,
        MenuChoice::ListAccounts,
        MenuChoice::MonthEnd,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuChoice::RegisterCustomer => "1",
            MenuChoice::OpenAccount => "2",
            MenuChoice::Deposit => "3",
            MenuChoice::EmployerDeposit => "4",
            MenuChoice::Withdraw => "5",
            MenuChoice::Transfer => "6",
            MenuChoice::Statement => "7",
            MenuChoice::ListCustomers => "8",
            MenuChoice::ListAccounts => "9",
            MenuChoice::MonthEnd => "10",
            MenuChoice::Save => "11",
            MenuChoice::Load => "12",
            MenuChoice::Exit => "0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::RegisterCustomer => "Register customer",
            MenuChoice::OpenAccount => "Open account",
            MenuChoice::Deposit => "Deposit",
            MenuChoice::EmployerDeposit => "Employer deposit (payroll)",
            MenuChoice::Withdraw => "Withdraw",
            MenuChoice::Transfer => "Transfer",
            MenuChoice::Statement => "Statement",
            MenuChoice::ListCustomers => "List customers",
            MenuChoice::ListAccounts => "List accounts",
            MenuChoice::MonthEnd => "Apply month-end",
            MenuChoice::Save => "Save",
            MenuChoice::Load => "Load",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|choice| choice.key() == s)
    }
}

/// Console state: configuration, the in-memory bank, and the terminal.
pub struct Session<R, W> {
    pub config: BankConfig,
    pub bank: Bank,
    pub console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: BankConfig, bank: Bank, console: Console<R, W>) -> Self {
        Self {
            config,
            bank,
            console,
        }
    }

    /// Run the menu until Exit or end of input. Command failures are
    /// reported and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        self.console.say("=== Minibank ===")?;
        loop {
            self.print_menu()?;
            let Some(line) = self.console.read_line("Option")? else {
                break;
            };
            let Some(choice) = MenuChoice::from_str(&line) else {
                self.console.say(format!("Unknown option: {:?}", line))?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            debug!(option = choice.label(), "Menu option selected");
            if let Err(err) = self.dispatch(choice) {
                self.console.say(format!("❌ {}", describe(&err)))?;
            }
        }

        if self.config.autosave {
            if let Err(err) = storage::save(self) {
                self.console.say(format!("❌ {}", describe(&err)))?;
            }
        }
        self.console.say("Goodbye.")
    }

    fn print_menu(&mut self) -> Result<()> {
        self.console.say("")?;
        for choice in MenuChoice::ALL {
            self.console
                .say(format!("{:>3}. {}", choice.key(), choice.label()))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::RegisterCustomer => customer::register(self),
            MenuChoice::OpenAccount => account::open(self),
            MenuChoice::Deposit => account::deposit(self),
            MenuChoice::EmployerDeposit => account::employer_deposit(self),
            MenuChoice::Withdraw => account::withdraw(self),
            MenuChoice::Transfer => account::transfer(self),
            MenuChoice::Statement => account::statement(self),
            MenuChoice::ListCustomers => customer::list(self),
            MenuChoice::ListAccounts => account::list(self),
            MenuChoice::MonthEnd => account::close_month(self),
            MenuChoice::Save => storage::save(self),
            MenuChoice::Load => storage::load(self),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Ask for branch and number and resolve the account.
    pub fn select_account(&mut self, role: &str) -> Result<AccountId> {
        let branch: u16 = self.console.ask_number(&format!("{} branch", role))?;
        let number: u32 = self.console.ask_number(&format!("{} number", role))?;
        let id = self
            .bank
            .find_account(branch, number)
            .ok_or_else(|| BusinessError::account_not_found(branch, number))?;
        Ok(id)
    }

    /// Like [`select_account`](Self::select_account), then check the PIN.
    pub fn authenticate(&mut self, role: &str) -> Result<AccountId> {
        let id = self.select_account(role)?;
        let pin = self.console.ask("PIN")?;
        let account = self
            .bank
            .account(id)
            .ok_or_else(|| anyhow!("account {} disappeared", id))?;
        if !account.verify_pin(&pin) {
            bail!("Invalid PIN for account {}", account.key());
        }
        Ok(id)
    }
}

/// Human message for a failed command.
pub fn describe(err: &anyhow::Error) -> String {
    let core = err
        .downcast_ref::<BusinessError>()
        .and_then(BusinessError::core)
        .or_else(|| err.downcast_ref::<CoreError>());

    match core {
        Some(CoreError::InsufficientFunds { needed, available }) => format!(
            "Insufficient funds: balance {}, requested {}",
            format_cents(*available),
            format_cents(*needed)
        ),
        Some(CoreError::LimitExceeded { limit }) => {
            format!("Monthly withdrawal limit reached ({} per month)", limit)
        }
        Some(CoreError::Unauthorized(_)) => {
            "Only the registered employer may deposit into a payroll account".to_string()
        }
        Some(CoreError::DuplicateCustomer(national_id)) => {
            format!("A customer with CPF {} already exists", national_id)
        }
        Some(CoreError::DuplicateAccount { branch, number }) => {
            format!("Account {:04}/{} already exists", branch, number)
        }
        Some(CoreError::InvalidTarget(reason)) => format!("Invalid destination: {}", reason),
        Some(CoreError::UnsupportedOperation { kind, operation }) => {
            format!("{} accounts cannot {}", kind, operation)
        }
        Some(other) => other.to_string(),
        None => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn run_script(bank: Bank, config: BankConfig, script: &str) -> (Bank, String) {
        let console = Console::new(script.as_bytes(), Vec::new());
        let mut session = Session::new(config, bank, console);
        session.run().unwrap();
        let output = String::from_utf8(session.console.output().clone()).unwrap();
        (session.bank, output)
    }

    fn no_autosave() -> BankConfig {
        BankConfig::new().with_autosave(false)
    }

    #[test]
    fn test_menu_choice_keys() {
        assert_eq!(MenuChoice::from_str("1"), Some(MenuChoice::RegisterCustomer));
        assert_eq!(MenuChoice::from_str(" 10 "), Some(MenuChoice::MonthEnd));
        assert_eq!(MenuChoice::from_str("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_str("13"), None);
    }

    #[test]
    fn test_register_open_deposit_withdraw() {
        let script = "\
1
João Silva
12345678901
joao@email.com
99999-9999
2
12345678901
1
1
12345
1234
1500

3
1
12345
500
5
1
12345
1234
200
0
";
        let (bank, output) = run_script(Bank::new(), no_autosave(), script);

        let id = bank.find_account(1, 12345).unwrap();
        assert_eq!(bank.account(id).unwrap().balance(), dec!(1800));
        assert!(output.contains("João Silva"));
        assert!(output.contains("balance 2000.00"));
        assert!(output.contains("balance 1800.00"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_errors_are_reported_and_loop_continues() {
        let script = "\
99
3
1
12345
5
1
";
        let (_, output) = run_script(Bank::new(), no_autosave(), script);
        assert!(output.contains("Unknown option: \"99\""));
        assert!(output.contains("❌ Account not found: no account 0001/12345"));
        assert!(output.contains("❌ input closed"));
    }

    #[test]
    fn test_wrong_pin_blocks_withdrawal() {
        let mut bank = Bank::new();
        let script_setup = "\
1
Ana Souza
98765432100


2
98765432100
1
1
67890
5678
100

0
";
        bank = run_script(bank, no_autosave(), script_setup).0;

        let script = "5\n1\n67890\n0000\n50\n0\n";
        let (bank, output) = run_script(bank, no_autosave(), script);
        assert!(output.contains("❌ Invalid PIN for account 0001/67890"));
        let id = bank.find_account(1, 67890).unwrap();
        assert_eq!(bank.account(id).unwrap().balance(), dec!(100));
    }

    #[test]
    fn test_autosave_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let config = BankConfig::new().with_data_dir(dir.path());
        let script = "1\nJoão Silva\n12345678901\n\n\n0\n";

        let (_, output) = run_script(Bank::new(), config, script);
        assert!(output.contains("Saved 1 customers"));
        assert!(dir.path().join("clientes.csv").exists());
    }

    #[test]
    fn test_describe_maps_core_errors() {
        let err = anyhow::Error::from(BusinessError::from(CoreError::insufficient_funds(
            dec!(250),
            dec!(100),
        )));
        assert_eq!(
            describe(&err),
            "Insufficient funds: balance 100.00, requested 250.00"
        );

        let err = anyhow::Error::from(CoreError::LimitExceeded { limit: 2 });
        assert_eq!(describe(&err), "Monthly withdrawal limit reached (2 per month)");

        let err = anyhow!("plain failure");
        assert_eq!(describe(&err), "plain failure");
    }
}
