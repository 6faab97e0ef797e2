//! Decimal price arithmetic helpers.
//!
//! All money in Shopdesk is `rust_decimal::Decimal` in the currency's
//! standard unit. The backend does not tag amounts with a currency, so
//! neither do we; everything is assumed to be in the store's single
//! configured currency.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to two decimal places.
///
/// Uses half-away-from-zero rounding, which is what the backend applies to
/// its own precomputed sale prices.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage discount to a price and round to two decimal places.
///
/// `percentage` is in the `0..=100` range (e.g. `20` for 20% off). Values
/// outside that range are not clamped here; callers decide whether a
/// percentage is meaningful before applying it.
#[must_use]
pub fn apply_percentage_discount(price: Decimal, percentage: Decimal) -> Decimal {
    round_money(price * (Decimal::ONE_HUNDRED - percentage) / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(10005, 3)), Decimal::new(1001, 2));
        assert_eq!(round_money(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
    }

    #[test]
    fn test_apply_percentage_discount() {
        // 20% off 100 -> 80.00
        let price = Decimal::new(100, 0);
        let discounted = apply_percentage_discount(price, Decimal::new(20, 0));
        assert_eq!(discounted, Decimal::new(8000, 2));
    }

    #[test]
    fn test_apply_zero_percentage_is_identity() {
        let price = Decimal::new(4999, 2);
        assert_eq!(apply_percentage_discount(price, Decimal::ZERO), price);
    }

    #[test]
    fn test_apply_fractional_percentage_rounds() {
        // 33.33% off 9.99 -> 6.66003 -> 6.66
        let price = Decimal::new(999, 2);
        let discounted = apply_percentage_discount(price, Decimal::new(3333, 2));
        assert_eq!(discounted, Decimal::new(666, 2));
    }
}
