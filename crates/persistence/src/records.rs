//! CSV record layouts
//!
//! One struct per file. Field order is the column order; records are
//! deserialized by position, so the header line is never consulted.

use chrono::{NaiveDate, TimeZone, Utc};
use minibank_core::{
    format_cents, Account, AccountKind, AccountType, Bank, Branch, Customer, CoreError,
    CoreResult, EntryKind, LedgerEntry,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const CUSTOMER_HEADERS: [&str; 4] = ["name", "national_id", "email", "phone"];

pub const BRANCH_HEADERS: [&str; 2] = ["number", "name"];

pub const ACCOUNT_HEADERS: [&str; 13] = [
    "account_number",
    "customer_name",
    "branch",
    "kind",
    "balance",
    "pin",
    "owner_national_id",
    "maintenance_fee",
    "interest_rate",
    "employer",
    "withdrawal_limit",
    "withdrawals_made",
    "label",
];

pub const LEDGER_HEADERS: [&str; 6] = [
    "kind",
    "account_number",
    "description",
    "amount",
    "date",
    "branch",
];

/// Row of `clientes.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            national_id: customer.national_id().to_string(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        }
    }
}

impl CustomerRecord {
    pub fn to_customer(&self) -> CoreResult<Customer> {
        Customer::new(&self.name, self.national_id.trim(), &self.email, &self.phone)
    }
}

/// Row of `agencias.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub number: u16,
    pub name: String,
}

impl From<&Branch> for BranchRecord {
    fn from(branch: &Branch) -> Self {
        Self {
            number: branch.number,
            name: branch.name.clone(),
        }
    }
}

/// Row of `contas.csv`
///
/// The first six columns are the base layout; the rest carry the owner key
/// and the kind-specific parameters and are empty when not applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_number: u32,
    pub customer_name: String,
    pub branch: u16,
    pub kind: AccountType,
    /// Two-decimal formatted balance
    pub balance: String,
    pub pin: String,
    pub owner_national_id: Option<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub maintenance_fee: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub interest_rate: Option<Decimal>,
    pub employer: Option<String>,
    pub withdrawal_limit: Option<u32>,
    pub withdrawals_made: Option<u32>,
    pub label: Option<String>,
}

impl AccountRecord {
    pub fn from_account(account: &Account, bank: &Bank) -> Self {
        let owner = bank.customer(account.owner());
        let mut record = Self {
            account_number: account.number(),
            customer_name: owner.map(|c| c.name.clone()).unwrap_or_default(),
            branch: account.branch(),
            kind: account.account_type(),
            balance: format_cents(account.balance()),
            pin: account.pin().to_string(),
            owner_national_id: owner.map(|c| c.national_id().to_string()),
            maintenance_fee: None,
            interest_rate: None,
            employer: None,
            withdrawal_limit: None,
            withdrawals_made: None,
            label: Some(account.label().to_string()),
        };
        match account.kind() {
            AccountKind::Checking { maintenance_fee } => {
                record.maintenance_fee = Some(*maintenance_fee);
            }
            AccountKind::Savings { interest_rate } => {
                record.interest_rate = Some(*interest_rate);
            }
            AccountKind::Payroll {
                employer,
                withdrawal_limit,
                withdrawals_made,
            } => {
                record.employer = Some(employer.clone());
                record.withdrawal_limit = Some(*withdrawal_limit);
                record.withdrawals_made = Some(*withdrawals_made);
            }
        }
        record
    }

    pub fn balance(&self) -> CoreResult<Decimal> {
        self.balance
            .trim()
            .parse::<Decimal>()
            .map_err(|_| CoreError::InvalidAmount(format!("bad balance {:?}", self.balance)))
    }

    /// Rebuild the kind payload. Missing fee or rate reads as zero; a payroll
    /// row needs its employer and limit.
    pub fn account_kind(&self) -> CoreResult<AccountKind> {
        match self.kind {
            AccountType::Checking => Ok(AccountKind::checking(
                self.maintenance_fee.unwrap_or(Decimal::ZERO),
            )),
            AccountType::Savings => Ok(AccountKind::savings(
                self.interest_rate.unwrap_or(Decimal::ZERO),
            )),
            AccountType::Payroll => {
                let employer = self
                    .employer
                    .as_deref()
                    .filter(|e| !e.trim().is_empty())
                    .ok_or_else(|| CoreError::validation("payroll row without employer"))?;
                let withdrawal_limit = self
                    .withdrawal_limit
                    .ok_or_else(|| CoreError::validation("payroll row without withdrawal limit"))?;
                Ok(AccountKind::Payroll {
                    employer: employer.trim().to_string(),
                    withdrawal_limit,
                    withdrawals_made: self.withdrawals_made.unwrap_or(0),
                })
            }
        }
    }
}

/// Row of `movimentacoes.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub kind: EntryKind,
    pub account_number: u32,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO date, day precision
    pub date: NaiveDate,
    pub branch: Option<u16>,
}

impl LedgerRecord {
    pub fn from_entry(entry: &LedgerEntry, branch: u16) -> Self {
        Self {
            kind: entry.kind(),
            account_number: entry.account_number(),
            description: entry.description().to_string(),
            amount: entry.amount(),
            date: entry.date(),
            branch: Some(branch),
        }
    }

    /// Rebuild the entry, stamped at midnight UTC of its date.
    pub fn to_entry(&self) -> CoreResult<LedgerEntry> {
        let midnight = self
            .date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| CoreError::validation(format!("bad date {}", self.date)))?;
        LedgerEntry::at(
            self.kind,
            self.account_number,
            self.description.clone(),
            self.amount,
            midnight,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_core::AccountKey;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_record_from_payroll() {
        let mut bank = Bank::new();
        let owner = bank
            .add_customer(Customer::new("Ana Souza", "98765432100", "", "").unwrap())
            .unwrap();
        let id = bank
            .add_account(
                Account::open(
                    AccountKey::new(2, 67890),
                    owner,
                    AccountKind::payroll("ACME", 3),
                    "5678",
                    dec!(2000),
                )
                .unwrap(),
            )
            .unwrap();

        let record = AccountRecord::from_account(bank.account(id).unwrap(), &bank);
        assert_eq!(record.customer_name, "Ana Souza");
        assert_eq!(record.balance, "2000.00");
        assert_eq!(record.kind, AccountType::Payroll);
        assert_eq!(record.employer.as_deref(), Some("ACME"));
        assert_eq!(record.maintenance_fee, None);

        assert_eq!(record.account_kind().unwrap(), AccountKind::payroll("ACME", 3));
        assert_eq!(record.balance().unwrap(), dec!(2000));
    }

    #[test]
    fn test_payroll_record_requires_employer() {
        let record = AccountRecord {
            account_number: 12345,
            customer_name: "X".into(),
            branch: 1,
            kind: AccountType::Payroll,
            balance: "0.00".into(),
            pin: "1234".into(),
            owner_national_id: None,
            maintenance_fee: None,
            interest_rate: None,
            employer: None,
            withdrawal_limit: Some(2),
            withdrawals_made: None,
            label: None,
        };
        assert!(record.account_kind().is_err());
    }

    #[test]
    fn test_ledger_record_to_entry() {
        let record = LedgerRecord {
            kind: EntryKind::TransferIn,
            account_number: 67890,
            description: "Transfer from account 0001/12345".into(),
            amount: dec!(500.00),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            branch: Some(2),
        };
        let entry = record.to_entry().unwrap();
        assert_eq!(entry.kind(), EntryKind::TransferIn);
        assert_eq!(entry.date(), record.date);
        assert_eq!(entry.timestamp().to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }
}
