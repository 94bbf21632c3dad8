/// Property-based tests for the advance-payment default amount
///
/// The suggested amount is the order total minus what was already paid,
/// never negative.

use hotel_api::records::models::amount_due;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

proptest! {
    /// Property: amount due is never negative
    #[test]
    fn test_amount_due_is_never_negative(
        total in 0i64..100_000_000i64,
        paid in 0i64..100_000_000i64,
    ) {
        let due = amount_due(cents(total), cents(paid));
        prop_assert!(due >= Decimal::ZERO);
    }

    /// Property: partial payments leave exactly the remainder
    #[test]
    fn test_partial_payment_leaves_remainder(
        total in 1i64..100_000_000i64,
        fraction in 0u32..100u32,
    ) {
        let total = cents(total);
        let paid = (total * Decimal::from(fraction) / dec!(100)).round_dp(2);

        let due = amount_due(total, paid);
        prop_assert_eq!(due + paid, total);
        prop_assert!(due <= total);
    }

    /// Property: overpayment clamps to zero
    #[test]
    fn test_overpayment_clamps_to_zero(
        total in 0i64..10_000_000i64,
        extra in 1i64..10_000_000i64,
    ) {
        let due = amount_due(cents(total), cents(total + extra));
        prop_assert_eq!(due, Decimal::ZERO);
    }
}

#[test]
fn test_known_amounts() {
    assert_eq!(amount_due(dec!(500.00), dec!(500.00)), Decimal::ZERO);
    assert_eq!(amount_due(dec!(320.00), Decimal::ZERO), dec!(320.00));
    assert_eq!(amount_due(dec!(180.50), dec!(80.25)), dec!(100.25));
}
