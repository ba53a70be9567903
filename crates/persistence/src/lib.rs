//! # Minibank Persistence
//!
//! CSV storage for Minibank.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      CsvStore                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌───────────┐  │
//! │  │   export    │    │   import    │    │  records  │  │
//! │  │  (writers)  │    │  (readers)  │    │  (rows)   │  │
//! │  └─────────────┘    └─────────────┘    └───────────┘  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use minibank_persistence::CsvStore;
//!
//! let store = CsvStore::new("data")?;
//! let (bank, report) = store.load()?;
//! println!("{} customers, {} lines skipped", bank.customer_count(), report.skipped());
//! store.save(&bank)?;
//! # Ok::<(), minibank_persistence::PersistenceError>(())
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod records;
pub mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use export::{export_accounts, export_branches, export_customers, export_ledger};
pub use import::{import_accounts, import_branches, import_customers, import_ledger, ImportSummary};
pub use store::{
    CsvStore, LoadReport, SaveReport, ACCOUNTS_FILE, BRANCHES_FILE, CUSTOMERS_FILE, LEDGER_FILE,
};
