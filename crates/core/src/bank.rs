//! # Bank Module
//!
//! In-memory registry of customers, branches and accounts.
//!
//! Customers and accounts live in two arenas (`Vec`s) and refer to each other
//! through index handles: an [`Account`] stores its owner's [`CustomerId`], a
//! [`Customer`] stores the [`AccountId`]s it owns. Nothing is ever removed, so
//! handles stay valid for the lifetime of the `Bank` that issued them.

use crate::account::{Account, AccountKey};
use crate::customer::{Branch, Customer};
use crate::error::{CoreError, CoreResult};
use crate::money::checked_add;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Handle to a customer inside a [`Bank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(usize);

impl CustomerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CUST_{:03}", self.0 + 1)
    }
}

/// Handle to an account inside a [`Bank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(usize);

impl AccountId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACC_{:03}", self.0 + 1)
    }
}

/// The registry.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    customers: Vec<Customer>,
    accounts: Vec<Account>,
    branches: Vec<Branch>,
    by_national_id: HashMap<String, CustomerId>,
    by_key: HashMap<AccountKey, AccountId>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    // === Customers ===

    /// Store a customer. Fails with `DuplicateCustomer` if the national ID is
    /// already registered; the registry is left unchanged in that case.
    pub fn add_customer(&mut self, customer: Customer) -> CoreResult<CustomerId> {
        if self.by_national_id.contains_key(customer.national_id()) {
            return Err(CoreError::DuplicateCustomer(customer.national_id().to_string()));
        }
        let id = CustomerId(self.customers.len());
        self.by_national_id
            .insert(customer.national_id().to_string(), id);
        self.customers.push(customer);
        Ok(id)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(id.0)
    }

    pub fn find_customer(&self, national_id: &str) -> Option<CustomerId> {
        self.by_national_id.get(national_id.trim()).copied()
    }

    /// Customers in registration order.
    pub fn customers(&self) -> impl Iterator<Item = (CustomerId, &Customer)> {
        self.customers
            .iter()
            .enumerate()
            .map(|(i, c)| (CustomerId(i), c))
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    // === Branches ===

    /// Register a branch. Returns `false` if the number was already known.
    pub fn add_branch(&mut self, branch: Branch) -> bool {
        if self.branch(branch.number).is_some() {
            return false;
        }
        self.branches.push(branch);
        self.branches.sort_by_key(|b| b.number);
        true
    }

    pub fn branch(&self, number: u16) -> Option<&Branch> {
        self.branches.iter().find(|b| b.number == number)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    // === Accounts ===

    /// Store an account and link it to its owner.
    ///
    /// Fails with `DuplicateAccount` if (branch, number) is taken and with
    /// `InvalidReference` if the owner is not in this registry. An unknown
    /// branch is registered with a default name.
    pub fn add_account(&mut self, account: Account) -> CoreResult<AccountId> {
        let key = account.key();
        if self.by_key.contains_key(&key) {
            return Err(CoreError::DuplicateAccount {
                branch: key.branch,
                number: key.number,
            });
        }
        let owner = account.owner();
        if self.customer(owner).is_none() {
            return Err(CoreError::InvalidReference(format!(
                "customer {} is not registered",
                owner
            )));
        }

        if self.branch(key.branch).is_none() {
            self.add_branch(Branch {
                number: key.branch,
                name: Branch::default_name(key.branch),
            });
        }

        let id = AccountId(self.accounts.len());
        self.accounts.push(account);
        self.by_key.insert(key, id);
        self.customers[owner.0].link_account(id);
        Ok(id)
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.0)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id.0)
    }

    pub fn find_account(&self, branch: u16, number: u32) -> Option<AccountId> {
        self.by_key.get(&AccountKey::new(branch, number)).copied()
    }

    /// Accounts in opening order.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountId, &Account)> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(i, a)| (AccountId(i), a))
    }

    pub fn accounts_of(&self, customer: CustomerId) -> Vec<(AccountId, &Account)> {
        self.customer(customer)
            .map(|c| {
                c.accounts()
                    .iter()
                    .filter_map(|&id| self.account(id).map(|a| (id, a)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Borrow two distinct accounts mutably.
    ///
    /// `InvalidReference` if `source` is unknown; `InvalidTarget` if `target`
    /// is unknown or the same account as `source`.
    pub fn pair_mut(
        &mut self,
        source: AccountId,
        target: AccountId,
    ) -> CoreResult<(&mut Account, &mut Account)> {
        if source.0 >= self.accounts.len() {
            return Err(CoreError::InvalidReference(format!(
                "account {} is not registered",
                source
            )));
        }
        if target.0 >= self.accounts.len() {
            return Err(CoreError::InvalidTarget(format!(
                "target account {} is not registered",
                target
            )));
        }
        if source == target {
            return Err(CoreError::InvalidTarget(
                "source and target are the same account".to_string(),
            ));
        }

        if source.0 < target.0 {
            let (head, tail) = self.accounts.split_at_mut(target.0);
            Ok((&mut head[source.0], &mut tail[0]))
        } else {
            let (head, tail) = self.accounts.split_at_mut(source.0);
            Ok((&mut tail[0], &mut head[target.0]))
        }
    }

    /// Transfer between two registered accounts. Either both sides (balances
    /// and ledger entries) change or neither does.
    pub fn transfer(
        &mut self,
        source: AccountId,
        target: AccountId,
        amount: Decimal,
    ) -> CoreResult<()> {
        let (from, to) = self.pair_mut(source, target)?;
        from.transfer_to(to, amount)
    }

    /// Sum of all balances; `InvalidAmount` if it does not fit a `Decimal`.
    pub fn total_deposits(&self) -> CoreResult<Decimal> {
        self.accounts
            .iter()
            .try_fold(Decimal::ZERO, |total, a| checked_add(total, a.balance()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountKind;
    use crate::ledger::EntryKind;
    use rust_decimal_macros::dec;

    fn bank_with_two_accounts() -> (Bank, AccountId, AccountId) {
        let mut bank = Bank::new();
        let joao = bank
            .add_customer(Customer::new("João Silva", "12345678901", "", "").unwrap())
            .unwrap();
        let ana = bank
            .add_customer(Customer::new("Ana Souza", "98765432100", "", "").unwrap())
            .unwrap();

        let a = bank
            .add_account(
                Account::open(
                    AccountKey::new(1, 12345),
                    joao,
                    AccountKind::checking(dec!(10)),
                    "1234",
                    dec!(1500.00),
                )
                .unwrap(),
            )
            .unwrap();
        let b = bank
            .add_account(
                Account::open(
                    AccountKey::new(2, 67890),
                    ana,
                    AccountKind::savings(dec!(0.01)),
                    "5678",
                    dec!(2000.00),
                )
                .unwrap(),
            )
            .unwrap();
        (bank, a, b)
    }

    #[test]
    fn test_duplicate_customer() {
        let mut bank = Bank::new();
        bank.add_customer(Customer::new("João", "12345678901", "", "").unwrap())
            .unwrap();

        let err = bank
            .add_customer(Customer::new("Outro João", "12345678901", "", "").unwrap())
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateCustomer("12345678901".into()));
        assert_eq!(bank.customer_count(), 1);
        assert_eq!(
            bank.customer(bank.find_customer("12345678901").unwrap())
                .unwrap()
                .name,
            "João"
        );
    }

    #[test]
    fn test_account_links_and_lookup() {
        let (bank, a, b) = bank_with_two_accounts();

        assert_eq!(bank.find_account(1, 12345), Some(a));
        assert_eq!(bank.find_account(2, 67890), Some(b));
        assert_eq!(bank.find_account(1, 67890), None);

        let owner = bank.account(a).unwrap().owner();
        assert_eq!(bank.customer(owner).unwrap().accounts(), &[a]);
        assert_eq!(bank.accounts_of(owner).len(), 1);

        // Branches registered implicitly
        assert_eq!(bank.branches().len(), 2);
        assert_eq!(bank.branch(2).unwrap().name, "Branch 0002");
    }

    #[test]
    fn test_duplicate_account() {
        let (mut bank, _, _) = bank_with_two_accounts();
        let owner = bank.find_customer("98765432100").unwrap();

        let err = bank
            .add_account(
                Account::open(
                    AccountKey::new(1, 12345),
                    owner,
                    AccountKind::checking(dec!(0)),
                    "0000",
                    dec!(0),
                )
                .unwrap(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateAccount {
                branch: 1,
                number: 12345
            }
        );
        assert_eq!(bank.account_count(), 2);
    }

    #[test]
    fn test_add_account_unknown_owner() {
        let mut bank = Bank::new();
        let err = bank
            .add_account(
                Account::open(
                    AccountKey::new(1, 12345),
                    CustomerId::new(7),
                    AccountKind::checking(dec!(0)),
                    "1234",
                    dec!(0),
                )
                .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidReference(_)));
    }

    #[test]
    fn test_transfer_between_accounts() {
        let (mut bank, a, b) = bank_with_two_accounts();

        bank.transfer(a, b, dec!(500.00)).unwrap();

        let from = bank.account(a).unwrap();
        let to = bank.account(b).unwrap();
        assert_eq!(from.balance(), dec!(1000.00));
        assert_eq!(to.balance(), dec!(2500.00));
        assert_eq!(from.entries()[0].kind(), EntryKind::TransferOut);
        assert_eq!(to.entries()[0].kind(), EntryKind::TransferIn);
        assert_eq!(bank.total_deposits().unwrap(), dec!(3500.00));

        // Reverse direction uses the other split branch
        bank.transfer(b, a, dec!(100)).unwrap();
        assert_eq!(bank.account(a).unwrap().balance(), dec!(1100.00));
    }

    #[test]
    fn test_transfer_bad_handles() {
        let (mut bank, a, b) = bank_with_two_accounts();

        assert!(matches!(
            bank.transfer(a, a, dec!(1)),
            Err(CoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            bank.transfer(a, AccountId::new(9), dec!(1)),
            Err(CoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            bank.transfer(AccountId::new(9), b, dec!(1)),
            Err(CoreError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_total_deposits_overflow() {
        let (mut bank, a, _) = bank_with_two_accounts();
        let owner = bank.account(a).unwrap().owner();
        bank.add_account(
            Account::open(
                AccountKey::new(1, 99999),
                owner,
                AccountKind::checking(dec!(10)),
                "1234",
                Decimal::MAX,
            )
            .unwrap(),
        )
        .unwrap();

        assert!(matches!(
            bank.total_deposits(),
            Err(CoreError::InvalidAmount(_))
        ));
    }
}
