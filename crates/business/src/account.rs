//! Account operations - open, deposit, withdraw, transfer, month end
//!
//! AccountController resolves handles against the registry, delegates to the
//! account, and logs each outcome. Domain failures are propagated unchanged.

use crate::error::{BusinessError, BusinessResult};
use crate::receipt::{MonthEndReport, TransactionReceipt};
use minibank_core::{
    Account, AccountId, AccountKey, AccountKind, AccountType, Bank, CoreError, CoreResult,
    CustomerId, EntryKind, LedgerEntry,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Parameters for opening an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAccount {
    pub branch: u16,
    pub number: u32,
    pub kind: AccountKind,
    pub pin: String,
    pub initial_balance: Decimal,
    pub label: Option<String>,
}

impl OpenAccount {
    pub fn new(branch: u16, number: u32, kind: AccountKind, pin: &str) -> Self {
        Self {
            branch,
            number,
            kind,
            pin: pin.to_string(),
            initial_balance: Decimal::ZERO,
            label: None,
        }
    }

    pub fn with_initial_balance(mut self, amount: Decimal) -> Self {
        self.initial_balance = amount;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Account Controller - operations on accounts in a [`Bank`]
pub struct AccountController<'a> {
    bank: &'a mut Bank,
}

impl<'a> AccountController<'a> {
    pub fn new(bank: &'a mut Bank) -> Self {
        Self { bank }
    }

    /// Open an account for `customer` and link it.
    pub fn open(&mut self, customer: CustomerId, request: OpenAccount) -> BusinessResult<AccountId> {
        let key = AccountKey::new(request.branch, request.number);
        let result = Account::open(
            key,
            customer,
            request.kind,
            &request.pin,
            request.initial_balance,
        )
        .map(|account| account.with_label(request.label.as_deref().unwrap_or_default()))
        .and_then(|account| self.bank.add_account(account));

        match result {
            Ok(id) => {
                info!(
                    account = %key,
                    customer = %customer,
                    initial_balance = %request.initial_balance,
                    "Account opened"
                );
                Ok(id)
            }
            Err(err) => {
                warn!(account = %key, error = %err, "Account opening rejected");
                Err(err.into())
            }
        }
    }

    // === Lookups ===

    pub fn find(&self, branch: u16, number: u32) -> Option<AccountId> {
        let found = self.bank.find_account(branch, number);
        debug!(branch, number, found = found.is_some(), "Account lookup");
        found
    }

    /// Like [`find`](Self::find) but a miss is an `AccountNotFound` error.
    pub fn require(&self, branch: u16, number: u32) -> BusinessResult<AccountId> {
        self.find(branch, number)
            .ok_or_else(|| BusinessError::account_not_found(branch, number))
    }

    pub fn get(&self, id: AccountId) -> BusinessResult<&Account> {
        self.bank.account(id).ok_or_else(|| unknown_account(id).into())
    }

    /// All accounts in opening order.
    pub fn list(&self) -> Vec<(AccountId, &Account)> {
        self.bank.accounts().collect()
    }

    pub fn accounts_of(&self, customer: CustomerId) -> Vec<(AccountId, &Account)> {
        self.bank.accounts_of(customer)
    }

    /// Ledger entries of one account, oldest first.
    pub fn statement(&self, id: AccountId) -> BusinessResult<&[LedgerEntry]> {
        Ok(self.get(id)?.entries())
    }

    // === Transactions ===

    pub fn deposit(&mut self, id: AccountId, amount: Decimal) -> BusinessResult<TransactionReceipt> {
        let account = self.account_mut(id)?;
        let key = account.key();
        let result = account.deposit(amount).map(|_| ());
        let balance = account.balance();
        finish(key, "deposit", amount, result)?;
        Ok(TransactionReceipt::new(EntryKind::Deposit, amount, balance).with_to_account(key))
    }

    /// Deposit made by a third party, the only way to credit a payroll
    /// account from outside the bank.
    pub fn deposit_from(
        &mut self,
        id: AccountId,
        amount: Decimal,
        depositor: &str,
    ) -> BusinessResult<TransactionReceipt> {
        let account = self.account_mut(id)?;
        let key = account.key();
        let result = account.deposit_from(amount, depositor).map(|_| ());
        let balance = account.balance();
        finish(key, "deposit_from", amount, result)?;
        Ok(TransactionReceipt::new(EntryKind::Deposit, amount, balance).with_to_account(key))
    }

    pub fn withdraw(&mut self, id: AccountId, amount: Decimal) -> BusinessResult<TransactionReceipt> {
        let account = self.account_mut(id)?;
        let key = account.key();
        let result = account.withdraw(amount).map(|_| ());
        let balance = account.balance();
        finish(key, "withdraw", amount, result)?;
        Ok(TransactionReceipt::new(EntryKind::Withdrawal, amount, balance).with_from_account(key))
    }

    /// Move `amount` between two accounts. The receipt carries the source
    /// balance.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> BusinessResult<TransactionReceipt> {
        let source = self.get(from)?.key();
        let result = self.bank.transfer(from, to, amount);
        finish(source, "transfer", amount, result)?;

        let target = self.get(to)?.key();
        let balance = self.get(from)?.balance();
        Ok(TransactionReceipt::new(EntryKind::TransferOut, amount, balance)
            .with_accounts(source, target))
    }

    // === Month end ===

    pub fn apply_maintenance_fee(&mut self, id: AccountId) -> BusinessResult<TransactionReceipt> {
        let account = self.account_mut(id)?;
        let key = account.key();
        let fee = account.apply_maintenance_fee();
        let balance = account.balance();
        let fee = finish_amount(key, "maintenance_fee", fee)?;
        Ok(TransactionReceipt::new(EntryKind::MaintenanceFee, fee, balance).with_from_account(key))
    }

    pub fn apply_interest(&mut self, id: AccountId) -> BusinessResult<TransactionReceipt> {
        let account = self.account_mut(id)?;
        let key = account.key();
        let interest = account.apply_interest();
        let balance = account.balance();
        let interest = finish_amount(key, "interest", interest)?;
        Ok(TransactionReceipt::new(EntryKind::Interest, interest, balance).with_to_account(key))
    }

    pub fn reset_monthly_withdrawals(&mut self, id: AccountId) -> BusinessResult<()> {
        let account = self.account_mut(id)?;
        let key = account.key();
        match account.reset_monthly_withdrawals() {
            Ok(()) => {
                info!(account = %key, "Payroll withdrawal counter reset");
                Ok(())
            }
            Err(err) => {
                warn!(account = %key, error = %err, "Payroll reset rejected");
                Err(err.into())
            }
        }
    }

    /// Run the month-end batch over every account: fee on checking, interest
    /// on savings, counter reset on payroll.
    ///
    /// A failing account is recorded in the report and the batch continues.
    pub fn close_month(&mut self) -> MonthEndReport {
        let mut report = MonthEndReport::default();

        for index in 0..self.bank.account_count() {
            let Some(account) = self.bank.account_mut(AccountId::new(index)) else {
                continue;
            };
            let key = account.key();

            let outcome = match account.account_type() {
                AccountType::Checking => account
                    .apply_maintenance_fee()
                    .map(|fee| report.fees_charged.push((key, fee))),
                AccountType::Savings => account
                    .apply_interest()
                    .map(|interest| report.interest_paid.push((key, interest))),
                AccountType::Payroll => account
                    .reset_monthly_withdrawals()
                    .map(|()| report.counters_reset.push(key)),
            };

            match outcome {
                Ok(()) => {}
                Err(CoreError::InvalidAmount(_)) => {
                    debug!(account = %key, "Nothing to apply at month end");
                    report.skipped.push(key);
                }
                Err(err) => {
                    warn!(account = %key, error = %err, "Month-end step failed");
                    report.failures.push((key, err));
                }
            }
        }

        info!(
            fees = report.fees_charged.len(),
            total_fees = %report.total_fees(),
            interest = report.interest_paid.len(),
            total_interest = %report.total_interest(),
            failures = report.failures.len(),
            "Month closed"
        );
        report
    }

    fn account_mut(&mut self, id: AccountId) -> BusinessResult<&mut Account> {
        self.bank
            .account_mut(id)
            .ok_or_else(|| unknown_account(id).into())
    }
}

fn unknown_account(id: AccountId) -> CoreError {
    CoreError::InvalidReference(format!("account {} is not registered", id))
}

fn finish(
    key: AccountKey,
    operation: &str,
    amount: Decimal,
    result: CoreResult<()>,
) -> BusinessResult<()> {
    match result {
        Ok(()) => {
            info!(account = %key, operation, amount = %amount, "Transaction completed");
            Ok(())
        }
        Err(err) => {
            warn!(account = %key, operation, amount = %amount, error = %err, "Transaction rejected");
            Err(err.into())
        }
    }
}

fn finish_amount(key: AccountKey, operation: &str, result: CoreResult<Decimal>) -> BusinessResult<Decimal> {
    match result {
        Ok(amount) => {
            info!(account = %key, operation, amount = %amount, "Month-end step applied");
            Ok(amount)
        }
        Err(err) => {
            warn!(account = %key, operation, error = %err, "Month-end step rejected");
            Err(err.into())
        }
    }
}
