//! Item Price Calculator
//!
//! Per line item:
//! - gross = unit_price × quantity
//! - discount (percentage of gross, or fixed capped at gross)
//! - operating cost from the selected calculation presets
//! - cost, net amount and profit

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{CalculationSetting, Discount, DiscountKind, OperatingCostLine, ValueType};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

// ==================== Conversion Helpers ====================

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// A calculation left the range `Decimal` can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount out of range")]
pub struct AmountOverflow;

impl From<AmountOverflow> for AppError {
    fn from(_: AmountOverflow) -> Self {
        AppError::with_message(ErrorCode::ValueOutOfRange, "Amount is too large to calculate")
    }
}

pub type PricingResult<T> = Result<T, AmountOverflow>;

pub(crate) fn add(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_add(b).ok_or(AmountOverflow)
}

pub(crate) fn sub(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_sub(b).ok_or(AmountOverflow)
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_mul(b).ok_or(AmountOverflow)
}

/// `value` percent of `base`
pub(crate) fn percent_of(base: Decimal, value: Decimal) -> PricingResult<Decimal> {
    Ok(mul(base, value)? / Decimal::ONE_HUNDRED)
}

/// Amount a discount takes off `base` (never more than `base`)
pub fn discount_amount(kind: DiscountKind, value: f64, base: Decimal) -> PricingResult<Decimal> {
    let value = to_decimal(value).max(Decimal::ZERO);
    let amount = match kind {
        DiscountKind::Percentage => percent_of(base, value)?,
        DiscountKind::Fixed => value,
    };
    Ok(round_money(amount.min(base).max(Decimal::ZERO)))
}

/// Pricing input for one line item
#[derive(Debug, Clone, Copy)]
pub struct ItemInput<'a> {
    pub unit_price: f64,
    pub unit_cost: f64,
    pub quantity: i32,
    pub discount: Option<&'a Discount>,
    pub presets: &'a [CalculationSetting],
}

/// Result of item price calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemCalculationResult {
    /// unit_price × quantity
    pub gross_amount: f64,
    pub discount_amount: f64,
    /// gross − discount (revenue)
    pub line_total: f64,
    /// One entry per applied preset
    pub cost_breakdown: Vec<OperatingCostLine>,
    pub operating_cost: f64,
    /// unit_cost × quantity
    pub cost: f64,
    /// line_total − operating_cost
    pub net_amount: f64,
    /// net_amount − cost
    pub profit: f64,
}

/// Price a single line item
pub fn calculate_item(input: &ItemInput<'_>) -> PricingResult<ItemCalculationResult> {
    let quantity = Decimal::from(input.quantity.max(0));
    let gross = round_money(mul(to_decimal(input.unit_price), quantity)?);

    let discount = match input.discount {
        Some(d) => discount_amount(d.kind, d.value, gross)?,
        None => Decimal::ZERO,
    };
    let revenue = sub(gross, discount)?;

    let mut operating_cost = Decimal::ZERO;
    let mut cost_breakdown = Vec::with_capacity(input.presets.len());
    for preset in input.presets {
        let value = to_decimal(preset.value);
        let amount = round_money(match preset.value_type {
            ValueType::Fixed => mul(value, quantity)?,
            ValueType::Percentage => percent_of(revenue, value)?,
        });
        operating_cost = add(operating_cost, amount)?;
        cost_breakdown.push(OperatingCostLine {
            setting_id: preset.id,
            name: preset.name.clone(),
            kind: preset.kind,
            value_type: preset.value_type,
            value: preset.value,
            amount: to_f64(amount),
        });
    }

    let cost = round_money(mul(to_decimal(input.unit_cost), quantity)?);
    let net_amount = sub(revenue, operating_cost)?;
    let profit = sub(net_amount, cost)?;

    Ok(ItemCalculationResult {
        gross_amount: to_f64(gross),
        discount_amount: to_f64(discount),
        line_total: to_f64(revenue),
        cost_breakdown,
        operating_cost: to_f64(operating_cost),
        cost: to_f64(cost),
        net_amount: to_f64(net_amount),
        profit: to_f64(profit),
    })
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::{discount, preset};
    use shared::models::CostKind;

    #[test]
    fn test_plain_item() {
        let result = calculate_item(&ItemInput {
            unit_price: 12.5,
            unit_cost: 5.0,
            quantity: 3,
            discount: None,
            presets: &[],
        })
        .unwrap();
        assert_eq!(result.gross_amount, 37.5);
        assert_eq!(result.discount_amount, 0.0);
        assert_eq!(result.line_total, 37.5);
        assert_eq!(result.operating_cost, 0.0);
        assert_eq!(result.cost, 15.0);
        assert_eq!(result.net_amount, 37.5);
        assert_eq!(result.profit, 22.5);
    }

    #[test]
    fn test_percentage_discount_and_mixed_presets() {
        let d = discount(DiscountKind::Percentage, 10.0);
        let presets = [
            preset(1, CostKind::Packaging, ValueType::Fixed, 0.5),
            preset(2, CostKind::Advertising, ValueType::Percentage, 5.0),
        ];
        let result = calculate_item(&ItemInput {
            unit_price: 20.0,
            unit_cost: 8.0,
            quantity: 2,
            discount: Some(&d),
            presets: &presets,
        })
        .unwrap();
        // gross 40, discount 4, revenue 36
        assert_eq!(result.gross_amount, 40.0);
        assert_eq!(result.discount_amount, 4.0);
        assert_eq!(result.line_total, 36.0);
        // packaging 0.5 × 2 = 1.0, advertising 5% of 36 = 1.8
        assert_eq!(result.cost_breakdown.len(), 2);
        assert_eq!(result.cost_breakdown[0].amount, 1.0);
        assert_eq!(result.cost_breakdown[1].amount, 1.8);
        assert_eq!(result.operating_cost, 2.8);
        assert_eq!(result.cost, 16.0);
        assert_eq!(result.net_amount, 33.2);
        assert_eq!(result.profit, 17.2);
    }

    #[test]
    fn test_fixed_discount_is_capped_at_gross() {
        let d = discount(DiscountKind::Fixed, 50.0);
        let result = calculate_item(&ItemInput {
            unit_price: 9.99,
            unit_cost: 4.0,
            quantity: 2,
            discount: Some(&d),
            presets: &[],
        })
        .unwrap();
        assert_eq!(result.gross_amount, 19.98);
        assert_eq!(result.discount_amount, 19.98);
        assert_eq!(result.line_total, 0.0);
        assert_eq!(result.profit, -8.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let presets = [preset(1, CostKind::Rent, ValueType::Percentage, 12.5)];
        let result = calculate_item(&ItemInput {
            unit_price: 0.1,
            unit_cost: 0.0,
            quantity: 1,
            discount: None,
            presets: &presets,
        })
        .unwrap();
        // 12.5% of 0.10 = 0.0125 → 0.01
        assert_eq!(result.operating_cost, 0.01);

        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }

    #[test]
    fn test_discount_amount_helper() {
        let base = Decimal::new(5000, 2);
        assert_eq!(discount_amount(DiscountKind::Percentage, 15.0, base), Ok(Decimal::new(750, 2)));
        assert_eq!(discount_amount(DiscountKind::Fixed, 7.25, base), Ok(Decimal::new(725, 2)));
        assert_eq!(discount_amount(DiscountKind::Fixed, 80.0, base), Ok(base));
        assert_eq!(discount_amount(DiscountKind::Fixed, -3.0, base), Ok(Decimal::ZERO));
        assert_eq!(
            discount_amount(DiscountKind::Percentage, 100.0, Decimal::MAX),
            Err(AmountOverflow)
        );
    }

    #[test]
    fn test_overflowing_amounts_are_errors() {
        let result = calculate_item(&ItemInput {
            unit_price: 1e28,
            unit_cost: 0.0,
            quantity: 10,
            discount: None,
            presets: &[],
        });
        assert_eq!(result, Err(AmountOverflow));

        let err = AppError::from(AmountOverflow);
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
