//! # Customer Module
//!
//! Customers and the branches their accounts live in.
//! A Customer owns only the list of its account handles; the accounts
//! themselves live in the [`Bank`](crate::bank::Bank) arena.

use crate::bank::AccountId;
use crate::error::CoreResult;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered client of the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name
    pub name: String,
    /// National ID (CPF), 11 digits, unique in the registry
    national_id: String,
    pub email: String,
    pub phone: String,
    /// Accounts owned by this customer, in opening order
    accounts: Vec<AccountId>,
}

impl Customer {
    /// Create a customer. Only the national ID format is enforced here;
    /// registration applies the contact-field checks.
    pub fn new(name: &str, national_id: &str, email: &str, phone: &str) -> CoreResult<Self> {
        validation::validate_national_id(national_id)?;
        Ok(Self {
            name: name.trim().to_string(),
            national_id: national_id.to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            accounts: Vec::new(),
        })
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    pub(crate) fn link_account(&mut self, account: AccountId) {
        self.accounts.push(account);
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (CPF {}, accounts: {})",
            self.name,
            self.national_id,
            self.accounts.len()
        )
    }
}

/// A bank branch (agência).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub number: u16,
    pub name: String,
}

impl Branch {
    pub fn new(number: u16, name: &str) -> CoreResult<Self> {
        validation::validate_branch(number)?;
        let name = match name.trim() {
            "" => Self::default_name(number),
            name => name.to_string(),
        };
        Ok(Self { number, name })
    }

    /// Name used when a branch is registered implicitly by opening an account.
    pub fn default_name(number: u16) -> String {
        format!("Branch {:04}", number)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} - {}", self.number, self.name)
    }
}
