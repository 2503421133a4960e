//! Pricing engine
//!
//! Line-item pricing (discount, operating-cost presets, cost, profit),
//! order aggregation and suggested retail prices.
//! Uses rust_decimal for calculations, stores as f64.

mod discount;
mod item_calculator;
mod order_calculator;
mod suggested;

pub use discount::*;
pub use item_calculator::*;
pub use order_calculator::*;
pub use suggested::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use shared::models::{
        CalculationSetting, CostKind, Discount, DiscountKind, ProductCostSetting, ValueType,
    };

    pub fn preset(id: i64, kind: CostKind, value_type: ValueType, value: f64) -> CalculationSetting {
        CalculationSetting {
            id,
            name: format!("{}_{}", kind.as_str(), id),
            kind,
            value_type,
            value,
            is_default: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn discount(kind: DiscountKind, value: f64) -> Discount {
        Discount {
            id: 1,
            code: "SAVE".into(),
            name: "Save".into(),
            kind,
            value,
            min_order_amount: 0.0,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn cost_setting(profit_margin: f64) -> ProductCostSetting {
        ProductCostSetting {
            id: 1,
            name: "Standard".into(),
            advertising: 1.0,
            packaging: 0.5,
            shipping: 2.0,
            personnel: 1.5,
            rent: 0.75,
            freeship: 0.25,
            profit_margin,
            is_default: true,
            created_at: 0,
            updated_at: 0,
        }
    }
}
