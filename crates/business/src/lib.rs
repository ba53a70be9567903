//! # Minibank Business
//!
//! Business logic layer - customer and account controllers over a
//! [`Bank`](minibank_core::Bank), runtime configuration, and snapshot
//! save/load through the CSV store.

pub mod account;
pub mod config;
pub mod customer;
pub mod error;
pub mod receipt;

pub use account::{AccountController, OpenAccount};
pub use config::BankConfig;
pub use customer::CustomerController;
pub use error::{BusinessError, BusinessResult};
pub use receipt::{MonthEndReport, TransactionReceipt};

use minibank_core::Bank;
use minibank_persistence::{LoadReport, SaveReport};

/// Load the snapshot in `config.data_dir` into a fresh [`Bank`].
pub fn load_bank(config: &BankConfig) -> BusinessResult<(Bank, LoadReport)> {
    Ok(config.store()?.load()?)
}

/// Save `bank` to `config.data_dir`.
pub fn save_bank(config: &BankConfig, bank: &Bank) -> BusinessResult<SaveReport> {
    Ok(config.store()?.save(bank)?)
}
