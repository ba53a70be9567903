//! Format checks for identifiers and contact data.

use crate::error::{CoreError, CoreResult};

/// Length of a national ID (CPF), digits only.
pub const NATIONAL_ID_LEN: usize = 11;
/// Largest branch number (4 digits).
pub const MAX_BRANCH: u16 = 9999;
/// Account numbers have 4 to 8 digits.
pub const MIN_ACCOUNT_NUMBER: u32 = 1_000;
pub const MAX_ACCOUNT_NUMBER: u32 = 99_999_999;
pub const MIN_PIN_LEN: usize = 4;
const MIN_PHONE_DIGITS: usize = 8;

pub fn validate_national_id(national_id: &str) -> CoreResult<()> {
    if national_id.len() != NATIONAL_ID_LEN || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation(format!(
            "national ID must be exactly {} digits: {:?}",
            NATIONAL_ID_LEN, national_id
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name must not be blank"));
    }
    Ok(())
}

/// Empty email is accepted; otherwise it needs `local@domain.tld`.
pub fn validate_email(email: &str) -> CoreResult<()> {
    if email.is_empty() {
        return Ok(());
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(CoreError::validation(format!("invalid email: {:?}", email)));
    }
    Ok(())
}

/// Empty phone is accepted; otherwise digits plus `+ - ( )` and spaces,
/// with at least 8 digits.
pub fn validate_phone(phone: &str) -> CoreResult<()> {
    if phone.is_empty() {
        return Ok(());
    }
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !allowed || digits < MIN_PHONE_DIGITS {
        return Err(CoreError::validation(format!("invalid phone: {:?}", phone)));
    }
    Ok(())
}

pub fn validate_branch(branch: u16) -> CoreResult<()> {
    if branch == 0 || branch > MAX_BRANCH {
        return Err(CoreError::validation(format!(
            "branch must be between 1 and {}: {}",
            MAX_BRANCH, branch
        )));
    }
    Ok(())
}

pub fn validate_account_number(number: u32) -> CoreResult<()> {
    if !(MIN_ACCOUNT_NUMBER..=MAX_ACCOUNT_NUMBER).contains(&number) {
        return Err(CoreError::validation(format!(
            "account number must have 4 to 8 digits: {}",
            number
        )));
    }
    Ok(())
}

pub fn validate_pin(pin: &str) -> CoreResult<()> {
    if pin.len() < MIN_PIN_LEN || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation(format!(
            "PIN must be numeric with at least {} digits",
            MIN_PIN_LEN
        )));
    }
    Ok(())
}
