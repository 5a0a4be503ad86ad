//! Stock calculator tests
//!
//! Property-based and unit tests for:
//! - Remaining stock of a product without operations is zero
//! - Debit adds to stock, credit subtracts, oversell goes negative
//! - Replay order never changes the final stock

use proptest::prelude::*;
use shared::{remaining_stock, running_balance, Action, Movement};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_no_operations_means_zero_stock() {
        assert_eq!(remaining_stock(Vec::<Movement>::new()), 0);
        assert!(running_balance(Vec::<Movement>::new()).is_empty());
    }

    #[test]
    fn test_purchase_then_sale() {
        // Ten received from a supplier, three sold to a customer
        let history = [
            Movement::new(Action::Debit, 10),
            Movement::new(Action::Credit, 3),
        ];
        assert_eq!(remaining_stock(history), 7);
        assert_eq!(running_balance(history), vec![10, 7]);
    }

    #[test]
    fn test_oversell_is_recorded_not_refused() {
        let history = [
            Movement::new(Action::Debit, 2),
            Movement::new(Action::Credit, 5),
        ];
        assert_eq!(remaining_stock(history), -3);
    }

    #[test]
    fn test_movement_delta_uses_group_action() {
        assert_eq!(Movement::new(Action::Debit, 4).delta(), 4);
        assert_eq!(Movement::new(Action::Credit, 4).delta(), -4);
    }

    #[test]
    fn test_large_quantities_do_not_overflow() {
        let history = vec![Movement::new(Action::Debit, i32::MAX); 4];
        assert_eq!(remaining_stock(history), 4 * i64::from(i32::MAX));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![Just(Action::Debit), Just(Action::Credit)]
    }

    fn movement_strategy() -> impl Strategy<Value = Movement> {
        (action_strategy(), 1i32..=10_000).prop_map(|(action, qty)| Movement::new(action, qty))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock = sum of debits - sum of credits
        #[test]
        fn prop_stock_is_debits_minus_credits(
            history in prop::collection::vec(movement_strategy(), 0..50)
        ) {
            let debits: i64 = history
                .iter()
                .filter(|m| m.action == Action::Debit)
                .map(|m| i64::from(m.quantity))
                .sum();
            let credits: i64 = history
                .iter()
                .filter(|m| m.action == Action::Credit)
                .map(|m| i64::from(m.quantity))
                .sum();

            prop_assert_eq!(remaining_stock(history.iter().copied()), debits - credits);
        }

        /// Final stock does not depend on the order operations are replayed in
        #[test]
        fn prop_stock_is_order_independent(
            history in prop::collection::vec(movement_strategy(), 0..50)
        ) {
            let mut reversed = history.clone();
            reversed.reverse();

            prop_assert_eq!(
                remaining_stock(history.iter().copied()),
                remaining_stock(reversed)
            );
        }

        /// The last running balance equals the remaining stock
        #[test]
        fn prop_running_balance_ends_at_remaining(
            history in prop::collection::vec(movement_strategy(), 1..50)
        ) {
            let balances = running_balance(history.iter().copied());
            prop_assert_eq!(balances.len(), history.len());
            prop_assert_eq!(
                balances.last().copied(),
                Some(remaining_stock(history.iter().copied()))
            );
        }

        /// Debit-only histories never produce negative stock
        #[test]
        fn prop_debits_only_is_positive(
            quantities in prop::collection::vec(1i32..=10_000, 1..30)
        ) {
            let history = quantities.iter().map(|&q| Movement::new(Action::Debit, q));
            prop_assert!(remaining_stock(history) > 0);
        }
    }
}
