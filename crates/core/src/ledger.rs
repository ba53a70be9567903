//! # Ledger Module
//!
//! `LedgerEntry` records one balance-affecting event on an account.
//! Entries are immutable and append-only: fields are private and only the
//! constructors can set them.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of ledger entry.
///
/// The serialized names are the codes used in `movimentacoes.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "DEPOSITO")]
    Deposit,
    #[serde(rename = "SAQUE")]
    Withdrawal,
    #[serde(rename = "TRANSFERENCIA_ENVIADA")]
    TransferOut,
    #[serde(rename = "TRANSFERENCIA_RECEBIDA")]
    TransferIn,
    #[serde(rename = "MANUTENCAO")]
    MaintenanceFee,
    #[serde(rename = "RENDIMENTO")]
    Interest,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "DEPOSITO",
            EntryKind::Withdrawal => "SAQUE",
            EntryKind::TransferOut => "TRANSFERENCIA_ENVIADA",
            EntryKind::TransferIn => "TRANSFERENCIA_RECEBIDA",
            EntryKind::MaintenanceFee => "MANUTENCAO",
            EntryKind::Interest => "RENDIMENTO",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEPOSITO" => Some(EntryKind::Deposit),
            "SAQUE" => Some(EntryKind::Withdrawal),
            "TRANSFERENCIA_ENVIADA" => Some(EntryKind::TransferOut),
            "TRANSFERENCIA_RECEBIDA" => Some(EntryKind::TransferIn),
            "MANUTENCAO" => Some(EntryKind::MaintenanceFee),
            "RENDIMENTO" => Some(EntryKind::Interest),
            _ => None,
        }
    }

    /// Whether this kind increases the balance.
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            EntryKind::Deposit | EntryKind::TransferIn | EntryKind::Interest
        )
    }

    /// Human label for statements.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdrawal => "Withdrawal",
            EntryKind::TransferOut => "Transfer out",
            EntryKind::TransferIn => "Transfer in",
            EntryKind::MaintenanceFee => "Maintenance fee",
            EntryKind::Interest => "Interest",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    kind: EntryKind,
    account_number: u32,
    description: String,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create an entry stamped with the current time.
    ///
    /// Fails with `InvalidAmount` unless `amount > 0`.
    pub fn new(
        kind: EntryKind,
        account_number: u32,
        description: impl Into<String>,
        amount: Decimal,
    ) -> CoreResult<Self> {
        Self::at(kind, account_number, description, amount, Utc::now())
    }

    /// Create an entry with an explicit timestamp (used when importing).
    pub fn at(
        kind: EntryKind,
        account_number: u32,
        description: impl Into<String>,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "ledger entry amount must be positive: {}",
                amount
            )));
        }
        Ok(Self {
            kind,
            account_number,
            description: description.into(),
            amount,
            timestamp,
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn account_number(&self) -> u32 {
        self.account_number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Day-precision date, as written to CSV.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Amount with sign applied (credits positive, debits negative).
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<16} {:>12} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind.label(),
            crate::money::format_cents(self.signed_amount()),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_kind_codes() {
        assert_eq!(EntryKind::TransferOut.as_str(), "TRANSFERENCIA_ENVIADA");
        assert_eq!(EntryKind::from_str("saque"), Some(EntryKind::Withdrawal));
        assert_eq!(EntryKind::from_str("UNKNOWN"), None);

        assert!(EntryKind::Interest.is_credit());
        assert!(!EntryKind::MaintenanceFee.is_credit());
    }

    #[test]
    fn test_entry_rejects_non_positive_amount() {
        let err = LedgerEntry::new(EntryKind::Deposit, 12345, "zero", Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount(_)));

        assert!(LedgerEntry::new(EntryKind::Deposit, 12345, "neg", dec!(-1)).is_err());
    }

    #[test]
    fn test_entry_accessors() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let entry =
            LedgerEntry::at(EntryKind::Withdrawal, 12345, "Withdrawal", dec!(200), ts).unwrap();

        assert_eq!(entry.kind(), EntryKind::Withdrawal);
        assert_eq!(entry.account_number(), 12345);
        assert_eq!(entry.amount(), dec!(200));
        assert_eq!(entry.signed_amount(), dec!(-200));
        assert_eq!(entry.date().to_string(), "2024-03-15");
    }
}
