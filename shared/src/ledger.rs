//! Ledger arithmetic: line amounts, group totals and stock replay
//!
//! Stock is never stored. It is derived by replaying a product's
//! operations: debit adds the quantity, credit subtracts it. The result is
//! allowed to go negative, an oversell is recorded rather than refused.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Action;

/// quantity × price × (1 − discount/100)
pub fn line_amount(quantity: i32, price: Decimal, discount: Decimal) -> Decimal {
    Decimal::from(quantity) * price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
}

/// [`line_amount`] that reports overflow as `None` instead of panicking
pub fn checked_line_amount(quantity: i32, price: Decimal, discount: Decimal) -> Option<Decimal> {
    let kept = Decimal::ONE.checked_sub(discount.checked_div(Decimal::ONE_HUNDRED)?)?;
    Decimal::from(quantity).checked_mul(price)?.checked_mul(kept)
}

/// One product movement as seen by the stock calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub action: Action,
    pub quantity: i32,
}

impl Movement {
    pub fn new(action: Action, quantity: i32) -> Self {
        Self { action, quantity }
    }

    pub fn delta(&self) -> i64 {
        self.action.signed(self.quantity)
    }
}

/// Net quantity of a product after replaying all of its movements
pub fn remaining_stock<I>(movements: I) -> i64
where
    I: IntoIterator<Item = Movement>,
{
    movements.into_iter().map(|m| m.delta()).sum()
}

/// Balance after each movement, in the order given
pub fn running_balance<I>(movements: I) -> Vec<i64>
where
    I: IntoIterator<Item = Movement>,
{
    movements
        .into_iter()
        .scan(0i64, |balance, m| {
            *balance += m.delta();
            Some(*balance)
        })
        .collect()
}

/// One priced line of an operation group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: i32,
    pub price: Decimal,
    pub discount: Decimal,
}

impl LineItem {
    pub fn amount(&self) -> Decimal {
        line_amount(self.quantity, self.price, self.discount)
    }

    pub fn checked_amount(&self) -> Option<Decimal> {
        checked_line_amount(self.quantity, self.price, self.discount)
    }
}

/// Displayed totals of an operation group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupTotals {
    pub total_quantity: i64,
    /// Sum of line amounts, rounded to 2 decimals
    pub total_amount: Decimal,
}

/// Sum quantities and amounts across a group's lines.
///
/// Amounts are summed unrounded and the sum is rounded once, half to even.
pub fn group_totals<'a, I>(lines: I) -> GroupTotals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let (quantity, amount) = lines
        .into_iter()
        .fold((0i64, Decimal::ZERO), |(q, a), line| {
            (q + i64::from(line.quantity), a + line.amount())
        });

    GroupTotals {
        total_quantity: quantity,
        total_amount: amount.round_dp(2),
    }
}

/// [`group_totals`] for unvalidated input; `None` when an amount overflows
pub fn checked_group_totals<'a, I>(lines: I) -> Option<GroupTotals>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let (quantity, amount) = lines
        .into_iter()
        .try_fold((0i64, Decimal::ZERO), |(q, a), line| {
            Some((
                q.checked_add(i64::from(line.quantity))?,
                a.checked_add(line.checked_amount()?)?,
            ))
        })?;

    Some(GroupTotals {
        total_quantity: quantity,
        total_amount: amount.round_dp(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_no_movements_is_zero() {
        assert_eq!(remaining_stock(Vec::new()), 0);
    }

    #[test]
    fn test_debit_then_credit() {
        let movements = [Movement::new(Action::Debit, 10), Movement::new(Action::Credit, 3)];
        assert_eq!(remaining_stock(movements), 7);
        assert_eq!(running_balance(movements), vec![10, 7]);
    }

    #[test]
    fn test_oversell_goes_negative() {
        let movements = [Movement::new(Action::Debit, 2), Movement::new(Action::Credit, 5)];
        assert_eq!(remaining_stock(movements), -3);
    }

    #[test]
    fn test_line_amount_with_discount() {
        assert_eq!(line_amount(4, dec("25.00"), dec("10")), dec("90"));
        assert_eq!(line_amount(1, dec("19.99"), Decimal::ZERO), dec("19.99"));
        assert_eq!(line_amount(3, dec("10.00"), Decimal::ONE_HUNDRED), Decimal::ZERO);
    }

    #[test]
    fn test_group_totals_rounds_sum_once() {
        let lines = [
            LineItem { quantity: 1, price: dec("0.333"), discount: Decimal::ZERO },
            LineItem { quantity: 1, price: dec("0.333"), discount: Decimal::ZERO },
            LineItem { quantity: 1, price: dec("0.333"), discount: Decimal::ZERO },
        ];
        let totals = group_totals(&lines);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total_amount, dec("1.00"));
    }

    #[test]
    fn test_empty_group_totals() {
        assert_eq!(group_totals(&Vec::<LineItem>::new()), GroupTotals::default());
    }

    #[test]
    fn test_checked_line_amount_matches_unchecked() {
        assert_eq!(
            checked_line_amount(4, dec("25.00"), dec("10")),
            Some(line_amount(4, dec("25.00"), dec("10")))
        );
    }

    #[test]
    fn test_checked_line_amount_overflow_is_none() {
        assert_eq!(checked_line_amount(10, Decimal::MAX, Decimal::ZERO), None);
    }

    #[test]
    fn test_checked_group_totals_overflow_is_none() {
        let line = LineItem {
            quantity: 1,
            price: Decimal::MAX,
            discount: Decimal::ZERO,
        };
        assert_eq!(checked_group_totals(&[line, line]), None);
        assert!(checked_group_totals(&[line]).is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Within validated ranges the checked amount never overflows
        #[test]
        fn prop_checked_amount_agrees_in_range(
            quantity in 1i32..=i32::MAX,
            cents in 0i64..1_000_000_000_000i64,
            discount_cents in 0i64..=10_000i64,
        ) {
            let price = Decimal::new(cents, 2);
            let discount = Decimal::new(discount_cents, 2);
            prop_assert_eq!(
                checked_line_amount(quantity, price, discount),
                Some(line_amount(quantity, price, discount))
            );
        }
    }
}
