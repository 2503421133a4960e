//! Discount Model

use serde::{Deserialize, Serialize};

/// How a discount value is applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "discount_kind", rename_all = "snake_case"))]
pub enum DiscountKind {
    /// `value` percent of the gross line amount (0 < value <= 100)
    Percentage,
    /// `value` currency units off, capped at the gross line amount
    Fixed,
}

/// Discount entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub id: i64,
    /// Stored uppercase
    pub code: String,
    pub name: String,
    pub kind: DiscountKind,
    pub value: f64,
    /// Minimum order subtotal required
    pub min_order_amount: f64,
    /// Valid from (Unix millis)
    pub starts_at: Option<i64>,
    /// Valid until (Unix millis, exclusive)
    pub ends_at: Option<i64>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCreate {
    pub code: String,
    pub name: String,
    pub kind: DiscountKind,
    pub value: f64,
    pub min_order_amount: Option<f64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update discount payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscountUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub kind: Option<DiscountKind>,
    pub value: Option<f64>,
    pub min_order_amount: Option<f64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
}

/// Result of checking a discount code against a subtotal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCheck {
    pub discount: Discount,
    pub subtotal: f64,
    /// Amount the discount takes off `subtotal`
    pub discount_amount: f64,
}
