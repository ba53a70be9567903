//! Business layer errors
//!
//! Domain and persistence failures pass through unchanged; the two lookup
//! variants cover identifiers typed in by a user.

use minibank_core::CoreError;
use minibank_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Not found errors ===
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // === Wrapped errors ===
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    pub fn customer_not_found(national_id: &str) -> Self {
        Self::CustomerNotFound(format!("no customer with national ID {}", national_id))
    }

    pub fn account_not_found(branch: u16, number: u32) -> Self {
        Self::AccountNotFound(format!("no account {:04}/{}", branch, number))
    }

    /// The domain error underneath, if any.
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(err) => Some(err),
            Self::Persistence(PersistenceError::Core(err)) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CustomerNotFound(_) | Self::AccountNotFound(_))
    }
}
