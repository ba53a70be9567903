//! CSV store - directory of four files
//!
//! ```text
//! data/
//! ├── clientes.csv        customers
//! ├── agencias.csv        branches
//! ├── contas.csv          accounts
//! └── movimentacoes.csv   ledger entries
//! ```
//!
//! Files are written to a `.tmp` sibling first and renamed into place, so an
//! interrupted save leaves the previous snapshot readable.

use crate::error::PersistenceResult;
use crate::export::{export_accounts, export_branches, export_customers, export_ledger};
use crate::import::{import_accounts, import_branches, import_customers, import_ledger, ImportSummary};
use minibank_core::Bank;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CUSTOMERS_FILE: &str = "clientes.csv";
pub const BRANCHES_FILE: &str = "agencias.csv";
pub const ACCOUNTS_FILE: &str = "contas.csv";
pub const LEDGER_FILE: &str = "movimentacoes.csv";

/// Record counts written by [`CsvStore::save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub customers: usize,
    pub branches: usize,
    pub accounts: usize,
    pub entries: usize,
}

/// Per-file outcome of [`CsvStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub customers: ImportSummary,
    pub branches: ImportSummary,
    pub accounts: ImportSummary,
    pub entries: ImportSummary,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.customers.skipped + self.branches.skipped + self.accounts.skipped + self.entries.skipped
    }
}

/// Reads and writes a [`Bank`] snapshot in a data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    base_path: PathBuf,
}

impl CsvStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> PersistenceResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Write all four files.
    pub fn save(&self, bank: &Bank) -> PersistenceResult<SaveReport> {
        let report = SaveReport {
            customers: self.write_file(CUSTOMERS_FILE, |w| export_customers(bank, w))?,
            branches: self.write_file(BRANCHES_FILE, |w| export_branches(bank, w))?,
            accounts: self.write_file(ACCOUNTS_FILE, |w| export_accounts(bank, w))?,
            entries: self.write_file(LEDGER_FILE, |w| export_ledger(bank, w))?,
        };
        info!(
            path = %self.base_path.display(),
            customers = report.customers,
            accounts = report.accounts,
            entries = report.entries,
            "Bank saved"
        );
        Ok(report)
    }

    /// Build a fresh [`Bank`] from the files on disk.
    ///
    /// Files are read in dependency order (customers, branches, accounts,
    /// ledger). A missing file contributes nothing; bad lines are skipped and
    /// counted in the report.
    pub fn load(&self) -> PersistenceResult<(Bank, LoadReport)> {
        let mut bank = Bank::new();
        let report = LoadReport {
            customers: self.read_file(CUSTOMERS_FILE, &mut bank, import_customers)?,
            branches: self.read_file(BRANCHES_FILE, &mut bank, import_branches)?,
            accounts: self.read_file(ACCOUNTS_FILE, &mut bank, import_accounts)?,
            entries: self.read_file(LEDGER_FILE, &mut bank, import_ledger)?,
        };
        info!(
            path = %self.base_path.display(),
            customers = bank.customer_count(),
            accounts = bank.account_count(),
            skipped = report.skipped(),
            "Bank loaded"
        );
        Ok((bank, report))
    }

    fn write_file<F>(&self, name: &str, export: F) -> PersistenceResult<usize>
    where
        F: FnOnce(&mut BufWriter<File>) -> PersistenceResult<usize>,
    {
        let path = self.file_path(name);
        let tmp = path.with_extension("csv.tmp");

        let mut writer = BufWriter::new(File::create(&tmp)?);
        let count = export(&mut writer)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &path)?;
        debug!(file = name, records = count, "CSV file written");
        Ok(count)
    }

    fn read_file<F>(&self, name: &str, bank: &mut Bank, import: F) -> PersistenceResult<ImportSummary>
    where
        F: FnOnce(&mut Bank, BufReader<File>, &str) -> PersistenceResult<ImportSummary>,
    {
        let path = self.file_path(name);
        if !path.exists() {
            debug!(file = name, "CSV file not found, nothing to import");
            return Ok(ImportSummary::default());
        }
        let reader = BufReader::new(File::open(&path)?);
        import(bank, reader, name)
    }
}
