//! Runtime configuration
//!
//! Defaults for new accounts and the location of the CSV snapshot. The CLI
//! fills this from command-line flags and `MINIBANK_*` environment variables.

use minibank_core::AccountKind;
use minibank_persistence::{CsvStore, PersistenceResult};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PAYROLL_LIMIT: u32 = 4;

/// 12.50 per month.
pub fn default_maintenance_fee() -> Decimal {
    Decimal::new(1250, 2)
}

/// 0.5% per month.
pub fn default_interest_rate() -> Decimal {
    Decimal::new(5, 3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    pub data_dir: PathBuf,
    pub maintenance_fee: Decimal,
    pub interest_rate: Decimal,
    pub payroll_limit: u32,
    /// Save the snapshot when the console exits.
    pub autosave: bool,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            maintenance_fee: default_maintenance_fee(),
            interest_rate: default_interest_rate(),
            payroll_limit: DEFAULT_PAYROLL_LIMIT,
            autosave: true,
        }
    }
}

impl BankConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_maintenance_fee(mut self, fee: Decimal) -> Self {
        self.maintenance_fee = fee;
        self
    }

    pub fn with_interest_rate(mut self, rate: Decimal) -> Self {
        self.interest_rate = rate;
        self
    }

    pub fn with_payroll_limit(mut self, limit: u32) -> Self {
        self.payroll_limit = limit;
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    // === Account defaults ===

    pub fn checking(&self) -> AccountKind {
        AccountKind::checking(self.maintenance_fee)
    }

    pub fn savings(&self) -> AccountKind {
        AccountKind::savings(self.interest_rate)
    }

    pub fn payroll(&self, employer: &str) -> AccountKind {
        AccountKind::payroll(employer, self.payroll_limit)
    }

    /// Open the CSV store in `data_dir`, creating the directory.
    pub fn store(&self) -> PersistenceResult<CsvStore> {
        CsvStore::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = BankConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.maintenance_fee, dec!(12.50));
        assert_eq!(config.interest_rate, dec!(0.005));
        assert_eq!(config.payroll_limit, 4);
        assert!(config.autosave);
    }

    #[test]
    fn test_builders_feed_account_kinds() {
        let config = BankConfig::new()
            .with_maintenance_fee(dec!(9.90))
            .with_interest_rate(dec!(0.01))
            .with_payroll_limit(2)
            .with_autosave(false);

        assert_eq!(config.checking(), AccountKind::checking(dec!(9.90)));
        assert_eq!(config.savings(), AccountKind::savings(dec!(0.01)));
        assert_eq!(config.payroll(" ACME "), AccountKind::payroll("ACME", 2));
        assert!(!config.autosave);
    }

    #[test]
    fn test_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = BankConfig::new().with_data_dir(dir.path().join("snapshots"));
        let store = config.store().unwrap();
        assert!(store.base_path().is_dir());
    }
}
