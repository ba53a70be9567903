//! # Money Module
//!
//! Amounts are `rust_decimal::Decimal` everywhere. Balances are kept at
//! cent precision (2 decimals); rounding is half away from zero. Amounts
//! finer than a cent are rejected, and balance arithmetic is checked so an
//! overflow surfaces as `InvalidAmount`.

use crate::error::{CoreError, CoreResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on balances and ledger amounts.
pub const CENTS: u32 = 2;

/// Round to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with exactly two decimals (`1500` -> `"1500.00"`).
pub fn format_cents(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Reject zero and negative amounts, and amounts finer than a cent.
pub fn ensure_positive(amount: Decimal, operation: &str) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "{} amount must be positive: {}",
            operation, amount
        )));
    }
    ensure_cents(amount, operation)
}

/// Reject amounts with more than two significant decimal places.
/// Trailing zeros do not count: `10.500` is a valid cent amount.
pub fn ensure_cents(amount: Decimal, operation: &str) -> CoreResult<()> {
    if amount.normalize().scale() > CENTS {
        return Err(CoreError::InvalidAmount(format!(
            "{} amount has more than {} decimal places: {}",
            operation, CENTS, amount
        )));
    }
    Ok(())
}

/// `a + b`, or `InvalidAmount` on overflow.
pub fn checked_add(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {} + {}", a, b)))
}

/// `a - b`, or `InvalidAmount` on overflow.
pub fn checked_sub(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {} - {}", a, b)))
}

/// `a * b`, or `InvalidAmount` on overflow.
pub fn checked_mul(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| CoreError::InvalidAmount(format!("amount out of range: {} * {}", a, b)))
}

/// Parse a user-supplied amount, accepting a decimal comma (`"10,50"`).
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let normalized = input.trim().replace(',', ".");
    normalized
        .parse::<Decimal>()
        .map_err(|_| CoreError::InvalidAmount(format!("not a number: {:?}", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_cents(dec!(10.004)), dec!(10.00));
        assert_eq!(round_cents(dec!(7.5)), dec!(7.5));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(dec!(1500)), "1500.00");
        assert_eq!(format_cents(dec!(0.5)), "0.50");
        assert_eq!(format_cents(dec!(1800.456)), "1800.46");
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(dec!(0.01), "Deposit").is_ok());
        assert!(matches!(
            ensure_positive(Decimal::ZERO, "Deposit"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(ensure_positive(dec!(-5), "Withdrawal").is_err());
    }

    #[test]
    fn test_ensure_cents() {
        assert!(ensure_positive(dec!(10.500), "Deposit").is_ok());
        assert!(ensure_cents(dec!(1500), "Deposit").is_ok());
        assert!(matches!(
            ensure_positive(dec!(0.005), "Deposit"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(ensure_cents(dec!(-0.001), "Balance").is_err());
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(checked_add(dec!(1.10), dec!(2.20)).unwrap(), dec!(3.30));
        assert_eq!(checked_sub(dec!(5), dec!(7.50)).unwrap(), dec!(-2.50));
        assert_eq!(checked_mul(dec!(1000), dec!(0.005)).unwrap(), dec!(5));
        assert!(matches!(
            checked_add(Decimal::MAX, dec!(1)),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(checked_sub(Decimal::MIN, dec!(1)).is_err());
        assert!(checked_mul(Decimal::MAX, dec!(2)).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 500.00 ").unwrap(), dec!(500.00));
        assert_eq!(parse_amount("10,50").unwrap(), dec!(10.50));
        assert!(parse_amount("abc").is_err());
    }
}
