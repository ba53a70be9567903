//! Customer operations - register, lookup, list
//!
//! CustomerController applies the full contact validation before a customer
//! reaches the registry.

use crate::error::{BusinessError, BusinessResult};
use minibank_core::validation::{validate_email, validate_name, validate_phone};
use minibank_core::{Bank, Customer, CustomerId};
use tracing::{debug, info, warn};

/// Customer Controller - registration and lookups over a [`Bank`]
pub struct CustomerController<'a> {
    bank: &'a mut Bank,
}

impl<'a> CustomerController<'a> {
    pub fn new(bank: &'a mut Bank) -> Self {
        Self { bank }
    }

    /// Register a new customer.
    ///
    /// Rejects a blank name, a national ID that is not 11 digits, a malformed
    /// email or phone (both optional), and an already registered national ID.
    pub fn register(
        &mut self,
        name: &str,
        national_id: &str,
        email: &str,
        phone: &str,
    ) -> BusinessResult<CustomerId> {
        let (national_id, email, phone) = (national_id.trim(), email.trim(), phone.trim());
        let result = validate_name(name)
            .and_then(|_| validate_email(email))
            .and_then(|_| validate_phone(phone))
            .and_then(|_| Customer::new(name, national_id, email, phone))
            .and_then(|customer| self.bank.add_customer(customer));

        match result {
            Ok(id) => {
                info!(customer = %id, national_id, "Customer registered");
                Ok(id)
            }
            Err(err) => {
                warn!(national_id, error = %err, "Customer registration rejected");
                Err(err.into())
            }
        }
    }

    pub fn find_by_national_id(&self, national_id: &str) -> Option<CustomerId> {
        let found = self.bank.find_customer(national_id);
        debug!(national_id, found = found.is_some(), "Customer lookup");
        found
    }

    /// Like [`find_by_national_id`](Self::find_by_national_id) but a miss is
    /// a `CustomerNotFound` error.
    pub fn require(&self, national_id: &str) -> BusinessResult<CustomerId> {
        self.find_by_national_id(national_id)
            .ok_or_else(|| BusinessError::customer_not_found(national_id.trim()))
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.bank.customer(id)
    }

    /// All customers in registration order.
    pub fn list(&self) -> Vec<(CustomerId, &Customer)> {
        self.bank.customers().collect()
    }
}
