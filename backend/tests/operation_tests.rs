//! Operation amount and group totals tests
//!
//! Property-based and unit tests for:
//! - amount = quantity × price × (1 − discount/100)
//! - Amount grows with quantity and price, shrinks with discount
//! - Group totals are the sums of their lines, amount rounded once

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{group_totals, line_amount, GroupTotals, LineItem};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_amount_without_discount() {
        assert_eq!(line_amount(3, dec("19.99"), Decimal::ZERO), dec("59.97"));
    }

    #[test]
    fn test_amount_with_discount() {
        // 4 × 250.00 with 15% off
        assert_eq!(line_amount(4, dec("250.00"), dec("15")), dec("850"));
    }

    #[test]
    fn test_full_discount_is_free() {
        assert_eq!(line_amount(7, dec("12.50"), dec("100")), Decimal::ZERO);
    }

    #[test]
    fn test_zero_price_is_free() {
        assert_eq!(line_amount(7, Decimal::ZERO, dec("5")), Decimal::ZERO);
    }

    #[test]
    fn test_group_totals() {
        let lines = [
            LineItem { quantity: 2, price: dec("10.00"), discount: Decimal::ZERO },
            LineItem { quantity: 1, price: dec("5.55"), discount: dec("10") },
        ];
        let totals = group_totals(&lines);
        assert_eq!(totals.total_quantity, 3);
        // 20.00 + 4.995 = 24.995, rounded half to even
        assert_eq!(totals.total_amount, dec("25.00"));
    }

    #[test]
    fn test_group_totals_sum_before_rounding() {
        // Each line is 0.005; rounding per line would give 0.00
        let line = LineItem { quantity: 1, price: dec("0.01"), discount: dec("50") };
        let totals = group_totals(&[line, line, line]);
        assert_eq!(totals.total_amount, dec("0.02"));
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(group_totals(&Vec::<LineItem>::new()), GroupTotals::default());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=10_000
    }

    /// 0.00 to 100000.00
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// 0.00 to 100.00
    fn discount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn line_strategy() -> impl Strategy<Value = LineItem> {
        (quantity_strategy(), price_strategy(), discount_strategy()).prop_map(
            |(quantity, price, discount)| LineItem { quantity, price, discount },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Amount follows the line formula exactly
        #[test]
        fn prop_amount_formula(
            quantity in quantity_strategy(),
            price in price_strategy(),
            discount in discount_strategy()
        ) {
            let expected = Decimal::from(quantity) * price
                * (Decimal::ONE - discount / Decimal::ONE_HUNDRED);
            prop_assert_eq!(line_amount(quantity, price, discount), expected);
        }

        /// Amount never exceeds the undiscounted price and is never negative
        #[test]
        fn prop_amount_bounds(line in line_strategy()) {
            let amount = line.amount();
            prop_assert!(amount >= Decimal::ZERO);
            prop_assert!(amount <= Decimal::from(line.quantity) * line.price);
        }

        /// More quantity never costs less
        #[test]
        fn prop_amount_monotonic_in_quantity(
            line in line_strategy(),
            extra in 1i32..=100
        ) {
            let more = line_amount(line.quantity + extra, line.price, line.discount);
            prop_assert!(more >= line.amount());
        }

        /// A higher price never costs less
        #[test]
        fn prop_amount_monotonic_in_price(
            line in line_strategy(),
            extra in price_strategy()
        ) {
            let more = line_amount(line.quantity, line.price + extra, line.discount);
            prop_assert!(more >= line.amount());
        }

        /// A bigger discount never costs more
        #[test]
        fn prop_amount_inverse_in_discount(
            quantity in quantity_strategy(),
            price in price_strategy(),
            a in discount_strategy(),
            b in discount_strategy()
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(line_amount(quantity, price, high) <= line_amount(quantity, price, low));
        }

        /// Group quantity is the sum of line quantities, amount the rounded sum
        #[test]
        fn prop_group_totals_match_lines(
            lines in prop::collection::vec(line_strategy(), 0..20)
        ) {
            let totals = group_totals(&lines);

            let quantity: i64 = lines.iter().map(|l| i64::from(l.quantity)).sum();
            let amount: Decimal = lines.iter().map(LineItem::amount).sum();

            prop_assert_eq!(totals.total_quantity, quantity);
            prop_assert_eq!(totals.total_amount, amount.round_dp(2));
            prop_assert!(totals.total_amount.scale() <= 2);
        }
    }
}
