//! Suggested retail price from a product cost setting

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::models::ProductCostSetting;

use super::item_calculator::{PricingResult, add, percent_of, to_decimal, to_f64};

/// Suggested price with its breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedPrice {
    pub cost_setting_id: i64,
    pub purchase_price: f64,
    pub advertising: f64,
    pub packaging: f64,
    pub shipping: f64,
    pub personnel: f64,
    pub rent: f64,
    pub freeship: f64,
    /// purchase price + all per-unit costs
    pub base_cost: f64,
    pub profit_margin: f64,
    /// base_cost × profit_margin / 100
    pub margin_amount: f64,
    pub suggested_price: f64,
}

/// `(purchase + costs) × (1 + margin / 100)`
pub fn suggest_price(
    purchase_price: f64,
    setting: &ProductCostSetting,
) -> PricingResult<SuggestedPrice> {
    let base = [
        purchase_price,
        setting.advertising,
        setting.packaging,
        setting.shipping,
        setting.personnel,
        setting.rent,
        setting.freeship,
    ]
    .into_iter()
    .try_fold(Decimal::ZERO, |acc, value| add(acc, to_decimal(value)))?;

    let margin = percent_of(base, to_decimal(setting.profit_margin))?;
    let suggested = add(base, margin)?;

    Ok(SuggestedPrice {
        cost_setting_id: setting.id,
        purchase_price,
        advertising: setting.advertising,
        packaging: setting.packaging,
        shipping: setting.shipping,
        personnel: setting.personnel,
        rent: setting.rent,
        freeship: setting.freeship,
        base_cost: to_f64(base),
        profit_margin: setting.profit_margin,
        margin_amount: to_f64(margin),
        suggested_price: to_f64(suggested).max(0.0),
    })
}
