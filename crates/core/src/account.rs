//! # Account Module
//!
//! `Account` holds the shared state (key, owner, PIN, balance, ledger) and an
//! `AccountKind` payload carrying the kind-specific configuration. Kind rules
//! are dispatched with `match` on the payload.

use crate::bank::CustomerId;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{EntryKind, LedgerEntry};
use crate::money::{
    checked_add, checked_mul, checked_sub, ensure_cents, ensure_positive, format_cents,
    round_cents,
};
use crate::validation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account type code, as written to `contas.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "CORRENTE")]
    Checking,
    #[serde(rename = "POUPANCA")]
    Savings,
    #[serde(rename = "SALARIO")]
    Payroll,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CORRENTE",
            AccountType::Savings => "POUPANCA",
            AccountType::Payroll => "SALARIO",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CORRENTE" => Some(AccountType::Checking),
            "POUPANCA" => Some(AccountType::Savings),
            "SALARIO" => Some(AccountType::Payroll),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Payroll => "Payroll",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific account state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Checking account charged a fixed monthly fee.
    Checking { maintenance_fee: Decimal },
    /// Savings account. `interest_rate` is a fraction: 0.01 means 1% per month.
    Savings { interest_rate: Decimal },
    /// Payroll account: only `employer` may deposit, and withdrawals per
    /// month are capped at `withdrawal_limit`.
    Payroll {
        employer: String,
        withdrawal_limit: u32,
        withdrawals_made: u32,
    },
}

impl AccountKind {
    pub fn checking(maintenance_fee: Decimal) -> Self {
        AccountKind::Checking { maintenance_fee }
    }

    pub fn savings(interest_rate: Decimal) -> Self {
        AccountKind::Savings { interest_rate }
    }

    pub fn payroll(employer: &str, withdrawal_limit: u32) -> Self {
        AccountKind::Payroll {
            employer: employer.trim().to_string(),
            withdrawal_limit,
            withdrawals_made: 0,
        }
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Checking { .. } => AccountType::Checking,
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::Payroll { .. } => AccountType::Payroll,
        }
    }

    fn validate(&self) -> CoreResult<()> {
        match self {
            AccountKind::Checking { maintenance_fee } if *maintenance_fee < Decimal::ZERO => Err(
                CoreError::validation(format!("maintenance fee must not be negative: {}", maintenance_fee)),
            ),
            AccountKind::Checking { maintenance_fee }
                if ensure_cents(*maintenance_fee, "Maintenance fee").is_err() =>
            {
                Err(CoreError::validation(format!(
                    "maintenance fee must be whole cents: {}",
                    maintenance_fee
                )))
            }
            AccountKind::Savings { interest_rate } if *interest_rate < Decimal::ZERO => Err(
                CoreError::validation(format!("interest rate must not be negative: {}", interest_rate)),
            ),
            AccountKind::Payroll { employer, .. } if employer.trim().is_empty() => {
                Err(CoreError::validation("payroll employer must not be blank"))
            }
            AccountKind::Payroll {
                withdrawal_limit,
                withdrawals_made,
                ..
            } if *withdrawal_limit == 0 || withdrawals_made > withdrawal_limit => {
                Err(CoreError::validation(format!(
                    "invalid payroll withdrawal limit: {} (used {})",
                    withdrawal_limit, withdrawals_made
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Unique account key: branch + account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountKey {
    pub branch: u16,
    pub number: u32,
}

impl AccountKey {
    pub fn new(branch: u16, number: u32) -> Self {
        Self { branch, number }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{}", self.branch, self.number)
    }
}

/// A bank account.
///
/// Balance never goes negative: every debit path checks funds before
/// mutating, and every mutation appends its ledger entry in the same call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    key: AccountKey,
    owner: CustomerId,
    kind: AccountKind,
    pin: String,
    balance: Decimal,
    label: String,
    entries: Vec<LedgerEntry>,
}

impl Account {
    /// Open an account after checking identifiers, PIN, opening balance and
    /// kind parameters.
    pub fn open(
        key: AccountKey,
        owner: CustomerId,
        kind: AccountKind,
        pin: &str,
        initial_balance: Decimal,
    ) -> CoreResult<Self> {
        validation::validate_branch(key.branch)?;
        validation::validate_account_number(key.number)?;
        validation::validate_pin(pin)?;
        if initial_balance < Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "initial balance must not be negative: {}",
                initial_balance
            )));
        }
        if ensure_cents(initial_balance, "Initial").is_err() {
            return Err(CoreError::validation(format!(
                "initial balance must be whole cents: {}",
                initial_balance
            )));
        }
        kind.validate()?;

        let label = format!("{} {}", kind.account_type().label(), key.number);
        Ok(Self {
            key,
            owner,
            kind,
            pin: pin.to_string(),
            balance: initial_balance,
            label,
            entries: Vec::new(),
        })
    }

    pub fn with_label(mut self, label: &str) -> Self {
        if !label.trim().is_empty() {
            self.label = label.trim().to_string();
        }
        self
    }

    // === Accessors ===

    pub fn key(&self) -> AccountKey {
        self.key
    }

    pub fn branch(&self) -> u16 {
        self.key.branch
    }

    pub fn number(&self) -> u32 {
        self.key.number
    }

    pub fn owner(&self) -> CustomerId {
        self.owner
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// Append-only history, oldest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin.len() == pin.len()
            && self
                .pin
                .bytes()
                .zip(pin.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    // === Operations ===

    /// Deposit by the account holder.
    ///
    /// Payroll accounts reject this with `Unauthorized`; use
    /// [`Account::deposit_from`] with the employer identity instead.
    pub fn deposit(&mut self, amount: Decimal) -> CoreResult<&LedgerEntry> {
        ensure_positive(amount, "Deposit")?;
        if let AccountKind::Payroll { employer, .. } = &self.kind {
            return Err(CoreError::Unauthorized(format!(
                "only {} may deposit into payroll account {}",
                employer, self.key
            )));
        }
        self.credit(EntryKind::Deposit, amount, "Deposit".to_string())
    }

    /// Deposit made by a named third party.
    pub fn deposit_from(&mut self, amount: Decimal, depositor: &str) -> CoreResult<&LedgerEntry> {
        ensure_positive(amount, "Deposit")?;
        let depositor = depositor.trim();
        if let AccountKind::Payroll { employer, .. } = &self.kind {
            if !employer.eq_ignore_ascii_case(depositor) {
                return Err(CoreError::Unauthorized(format!(
                    "{:?} is not the employer authorized for payroll account {}",
                    depositor, self.key
                )));
            }
        }
        self.credit(
            EntryKind::Deposit,
            amount,
            format!("Deposit from {}", depositor),
        )
    }

    pub fn withdraw(&mut self, amount: Decimal) -> CoreResult<&LedgerEntry> {
        self.check_debit(amount, "Withdrawal")?;
        self.count_withdrawal();
        self.debit(EntryKind::Withdrawal, amount, "Withdrawal".to_string())
    }

    /// Move `amount` to `target`.
    ///
    /// Every check runs before either balance changes, so the credit on the
    /// target cannot fail once the source is debited. A payroll source counts
    /// the transfer against its withdrawal limit; a payroll target accepts it
    /// without the employer check.
    pub fn transfer_to(&mut self, target: &mut Account, amount: Decimal) -> CoreResult<()> {
        if target.key == self.key {
            return Err(CoreError::InvalidTarget(format!(
                "cannot transfer from account {} to itself",
                self.key
            )));
        }
        self.check_debit(amount, "Transfer")?;
        checked_add(target.balance, amount)?;

        self.count_withdrawal();
        let target_key = target.key;
        self.debit(
            EntryKind::TransferOut,
            amount,
            format!("Transfer to account {}", target_key),
        )?;
        target.credit(
            EntryKind::TransferIn,
            amount,
            format!("Transfer from account {}", self.key),
        )?;
        Ok(())
    }

    /// Charge the checking maintenance fee.
    pub fn apply_maintenance_fee(&mut self) -> CoreResult<Decimal> {
        let fee = match &self.kind {
            AccountKind::Checking { maintenance_fee } => *maintenance_fee,
            _ => return Err(self.unsupported("apply maintenance fee")),
        };
        ensure_positive(fee, "Maintenance fee")?;
        if self.balance < fee {
            return Err(CoreError::insufficient_funds(fee, self.balance));
        }
        self.debit(
            EntryKind::MaintenanceFee,
            fee,
            "Monthly maintenance fee".to_string(),
        )?;
        Ok(fee)
    }

    /// Credit `balance * interest_rate`, rounded to cents.
    pub fn apply_interest(&mut self) -> CoreResult<Decimal> {
        let rate = match &self.kind {
            AccountKind::Savings { interest_rate } => *interest_rate,
            _ => return Err(self.unsupported("apply interest")),
        };
        let interest = round_cents(checked_mul(self.balance, rate)?);
        ensure_positive(interest, "Interest")?;
        let percent = checked_mul(rate, Decimal::ONE_HUNDRED)?;
        self.credit(
            EntryKind::Interest,
            interest,
            format!("Monthly interest at {}%", percent.normalize()),
        )?;
        Ok(interest)
    }

    /// Start a new month for a payroll account.
    pub fn reset_monthly_withdrawals(&mut self) -> CoreResult<()> {
        if let AccountKind::Payroll {
            withdrawals_made, ..
        } = &mut self.kind
        {
            *withdrawals_made = 0;
            return Ok(());
        }
        Err(self.unsupported("reset monthly withdrawals"))
    }

    /// Remaining payroll withdrawals this month; `None` for other kinds.
    pub fn withdrawals_remaining(&self) -> Option<u32> {
        match &self.kind {
            AccountKind::Payroll {
                withdrawal_limit,
                withdrawals_made,
                ..
            } => Some(withdrawal_limit.saturating_sub(*withdrawals_made)),
            _ => None,
        }
    }

    /// Attach a previously recorded entry without touching the balance.
    ///
    /// Only for restoring history from storage, where the stored balance is
    /// authoritative.
    pub fn import_entry(&mut self, entry: LedgerEntry) -> CoreResult<()> {
        if entry.account_number() != self.key.number {
            return Err(CoreError::InvalidReference(format!(
                "entry for account {} cannot be attached to {}",
                entry.account_number(),
                self.key
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    // === Internals ===

    fn check_debit(&self, amount: Decimal, operation: &str) -> CoreResult<()> {
        ensure_positive(amount, operation)?;
        if let AccountKind::Payroll {
            withdrawal_limit,
            withdrawals_made,
            ..
        } = &self.kind
        {
            if withdrawals_made >= withdrawal_limit {
                return Err(CoreError::LimitExceeded {
                    limit: *withdrawal_limit,
                });
            }
        }
        if self.balance < amount {
            return Err(CoreError::insufficient_funds(amount, self.balance));
        }
        Ok(())
    }

    fn count_withdrawal(&mut self) {
        if let AccountKind::Payroll {
            withdrawals_made, ..
        } = &mut self.kind
        {
            *withdrawals_made += 1;
        }
    }

    fn credit(
        &mut self,
        kind: EntryKind,
        amount: Decimal,
        description: String,
    ) -> CoreResult<&LedgerEntry> {
        let balance = checked_add(self.balance, amount)?;
        let entry = LedgerEntry::new(kind, self.key.number, description, amount)?;
        self.balance = balance;
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    fn debit(
        &mut self,
        kind: EntryKind,
        amount: Decimal,
        description: String,
    ) -> CoreResult<&LedgerEntry> {
        let balance = checked_sub(self.balance, amount)?;
        let entry = LedgerEntry::new(kind, self.key.number, description, amount)?;
        self.balance = balance;
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    fn unsupported(&self, operation: &str) -> CoreError {
        CoreError::unsupported(self.account_type().label(), operation)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) balance {}",
            self.account_type().label(),
            self.key,
            self.label,
            format_cents(self.balance)
        )
    }
}
