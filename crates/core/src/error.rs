//! # Error Module
//!
//! Domain errors for Minibank, built with thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Every variant is a local, synchronous, non-retryable fault. Lookup misses
/// are not errors here; registries return `Option` for those.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // === Input errors ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transfer target: {0}")]
    InvalidTarget(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    // === Balance errors ===
    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("Monthly withdrawal limit of {limit} reached")]
    LimitExceeded { limit: u32 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // === Registry errors ===
    #[error("Customer already exists: {0}")]
    DuplicateCustomer(String),

    #[error("Account already exists: branch {branch}, number {number}")]
    DuplicateAccount { branch: u16, number: u32 },

    #[error("Operation not supported for {kind} account: {operation}")]
    UnsupportedOperation { kind: String, operation: String },
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn insufficient_funds(needed: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds { needed, available }
    }

    pub fn unsupported(kind: &str, operation: &str) -> Self {
        Self::UnsupportedOperation {
            kind: kind.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Malformed input: bad identifiers, non-positive amounts, bad targets.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::InvalidAmount(_)
                | CoreError::InvalidTarget(_)
                | CoreError::InvalidReference(_)
        )
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            CoreError::DuplicateCustomer(_) | CoreError::DuplicateAccount { .. }
        )
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, CoreError::InsufficientFunds { .. })
    }
}
