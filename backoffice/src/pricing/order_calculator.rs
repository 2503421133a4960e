//! Order-Level Price Calculator
//!
//! Aggregates priced line items into order totals:
//! - subtotal = Σ gross, discount_total = Σ discount
//! - total = subtotal − discount_total + shipping_fee (never below zero)
//! - profit = Σ item profit

use rust_decimal::prelude::*;
use serde::Serialize;

use super::item_calculator::{
    ItemCalculationResult, PricingResult, add, mul, sub, to_decimal, to_f64,
};

/// Result of order price calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderCalculationResult {
    /// Sum of gross line amounts
    pub subtotal: f64,
    pub discount_total: f64,
    pub operating_cost_total: f64,
    pub cost_total: f64,
    pub shipping_fee: f64,
    /// Amount the customer pays
    pub total: f64,
    pub profit: f64,
}

/// Aggregate line items into order totals
pub fn calculate_order(
    items: &[ItemCalculationResult],
    shipping_fee: f64,
) -> PricingResult<OrderCalculationResult> {
    let sum = |f: fn(&ItemCalculationResult) -> f64| -> PricingResult<Decimal> {
        items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| add(acc, to_decimal(f(item))))
    };

    let subtotal = sum(|i| i.gross_amount)?;
    let discount_total = sum(|i| i.discount_amount)?;
    let operating_cost_total = sum(|i| i.operating_cost)?;
    let cost_total = sum(|i| i.cost)?;
    let profit = sum(|i| i.profit)?;

    let shipping = to_decimal(shipping_fee).max(Decimal::ZERO);
    let total = add(sub(subtotal, discount_total)?, shipping)?.max(Decimal::ZERO);

    Ok(OrderCalculationResult {
        subtotal: to_f64(subtotal),
        discount_total: to_f64(discount_total),
        operating_cost_total: to_f64(operating_cost_total),
        cost_total: to_f64(cost_total),
        shipping_fee: to_f64(shipping),
        total: to_f64(total),
        profit: to_f64(profit),
    })
}

/// Σ gross of a set of (unit_price, quantity) pairs, used to check discount minimums
pub fn gross_subtotal(lines: impl IntoIterator<Item = (f64, i32)>) -> PricingResult<f64> {
    let subtotal = lines.into_iter().try_fold(Decimal::ZERO, |acc, (price, qty)| {
        add(acc, mul(to_decimal(price), Decimal::from(qty.max(0)))?)
    })?;
    Ok(to_f64(subtotal))
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::{discount, preset};
    use crate::pricing::{ItemInput, calculate_item};
    use shared::models::{CostKind, DiscountKind, ValueType};

    #[test]
    fn test_empty_order() {
        let result = calculate_order(&[], 0.0).unwrap();
        assert_eq!(result, OrderCalculationResult::default());
    }

    #[test]
    fn test_order_totals() {
        let d = discount(DiscountKind::Fixed, 3.0);
        let presets = [preset(1, CostKind::Shipping, ValueType::Fixed, 1.0)];
        let items = vec![
            calculate_item(&ItemInput {
                unit_price: 10.0,
                unit_cost: 4.0,
                quantity: 2,
                discount: Some(&d),
                presets: &presets,
            })
            .unwrap(),
            calculate_item(&ItemInput {
                unit_price: 5.5,
                unit_cost: 2.0,
                quantity: 1,
                discount: None,
                presets: &[],
            })
            .unwrap(),
        ];
        let result = calculate_order(&items, 4.99).unwrap();

        assert_eq!(result.subtotal, 25.5);
        assert_eq!(result.discount_total, 3.0);
        assert_eq!(result.operating_cost_total, 2.0);
        assert_eq!(result.cost_total, 10.0);
        assert_eq!(result.shipping_fee, 4.99);
        assert_eq!(result.total, 27.49);
        // item 1: 17 − 2 − 8 = 7; item 2: 5.5 − 2 = 3.5
        assert_eq!(result.profit, 10.5);
    }

    #[test]
    fn test_negative_shipping_is_ignored() {
        let items = vec![calculate_item(&ItemInput {
            unit_price: 10.0,
            unit_cost: 0.0,
            quantity: 1,
            discount: None,
            presets: &[],
        })
        .unwrap()];
        let result = calculate_order(&items, -5.0).unwrap();
        assert_eq!(result.shipping_fee, 0.0);
        assert_eq!(result.total, 10.0);
    }

    #[test]
    fn test_gross_subtotal() {
        assert_eq!(gross_subtotal([(19.99, 2), (0.01, 1)]), Ok(39.99));
        assert_eq!(gross_subtotal(std::iter::empty()), Ok(0.0));
        assert_eq!(
            gross_subtotal([(7e28, 1), (7e28, 1)]),
            Err(crate::pricing::AmountOverflow)
        );
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let big = ItemCalculationResult {
            gross_amount: 7e28,
            ..Default::default()
        };
        assert!(calculate_order(&[big.clone(), big], 0.0).is_err());
    }
}
