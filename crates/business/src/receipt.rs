//! Operation results returned by the controllers

use minibank_core::{AccountKey, CoreError, EntryKind};
use rust_decimal::Decimal;
use std::fmt;

/// Outcome of one balance-changing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub kind: EntryKind,
    pub amount: Decimal,
    pub from_account: Option<AccountKey>,
    pub to_account: Option<AccountKey>,
    /// Balance of the acting account after the operation.
    pub balance: Decimal,
}

impl TransactionReceipt {
    pub fn new(kind: EntryKind, amount: Decimal, balance: Decimal) -> Self {
        Self {
            kind,
            amount,
            from_account: None,
            to_account: None,
            balance,
        }
    }

    pub fn with_from_account(mut self, key: AccountKey) -> Self {
        self.from_account = Some(key);
        self
    }

    pub fn with_to_account(mut self, key: AccountKey) -> Self {
        self.to_account = Some(key);
        self
    }

    pub fn with_accounts(mut self, from: AccountKey, to: AccountKey) -> Self {
        self.from_account = Some(from);
        self.to_account = Some(to);
        self
    }
}

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.kind.label(), self.amount)?;
        if let Some(from) = self.from_account {
            write!(f, " from {}", from)?;
        }
        if let Some(to) = self.to_account {
            write!(f, " to {}", to)?;
        }
        write!(f, " (balance {:.2})", self.balance)
    }
}

/// Result of a month-end batch. Failures are collected per account; the
/// batch itself never aborts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthEndReport {
    pub fees_charged: Vec<(AccountKey, Decimal)>,
    pub interest_paid: Vec<(AccountKey, Decimal)>,
    pub counters_reset: Vec<AccountKey>,
    /// Accounts with nothing to apply: zero fee, or interest that rounds to zero.
    pub skipped: Vec<AccountKey>,
    pub failures: Vec<(AccountKey, CoreError)>,
}

impl MonthEndReport {
    pub fn total_fees(&self) -> Decimal {
        self.fees_charged.iter().map(|(_, fee)| *fee).sum()
    }

    pub fn total_interest(&self) -> Decimal {
        self.interest_paid.iter().map(|(_, interest)| *interest).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for MonthEndReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fees ({:.2}), {} interest credits ({:.2}), {} payroll counters reset, {} skipped, {} failures",
            self.fees_charged.len(),
            self.total_fees(),
            self.interest_paid.len(),
            self.total_interest(),
            self.counters_reset.len(),
            self.skipped.len(),
            self.failures.len()
        )
    }
}
