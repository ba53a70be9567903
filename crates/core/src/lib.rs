//! # Minibank Core
//!
//! Domain model for Minibank: customers, branches, typed accounts with an
//! append-only ledger, and the [`Bank`] registry that ties them together.
//!
//! ```rust
//! use minibank_core::{Account, AccountKey, AccountKind, Bank, Customer};
//! use rust_decimal_macros::dec;
//!
//! let mut bank = Bank::new();
//! let joao = bank
//!     .add_customer(Customer::new("João Silva", "12345678901", "joao@email.com", "99999-9999")?)?;
//! let account = Account::open(
//!     AccountKey::new(1, 12345),
//!     joao,
//!     AccountKind::checking(dec!(12.50)),
//!     "1234",
//!     dec!(1500.00),
//! )?;
//! let id = bank.add_account(account)?;
//!
//! let account = bank.account_mut(id).unwrap();
//! account.deposit(dec!(500.00))?;
//! account.withdraw(dec!(200.00))?;
//! assert_eq!(account.balance(), dec!(1800.00));
//! # Ok::<(), minibank_core::CoreError>(())
//! ```

pub mod account;
pub mod bank;
pub mod customer;
pub mod error;
pub mod ledger;
pub mod money;
pub mod validation;

pub use account::{Account, AccountKey, AccountKind, AccountType};
pub use bank::{AccountId, Bank, CustomerId};
pub use customer::{Branch, Customer};
pub use error::{CoreError, CoreResult};
pub use ledger::{EntryKind, LedgerEntry};
pub use money::{format_cents, parse_amount, round_cents};
