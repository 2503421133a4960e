//! Order Model

use serde::{Deserialize, Serialize};

use super::calculation_setting::{CostKind, ValueType};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "order_status", rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Allowed moves: pending→paid|cancelled, paid→shipped|cancelled, shipped→completed
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Cancelled)
                | (Self::Paid, Self::Shipped)
                | (Self::Paid, Self::Cancelled)
                | (Self::Shipped, Self::Completed)
        )
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    /// Back-reference written after the items are stored (`INV-YYYYMMDD-<seq>`)
    pub invoice_number: Option<String>,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub shipping_fee: f64,
    pub note: Option<String>,
    /// Σ gross line amounts
    pub subtotal: f64,
    pub discount_total: f64,
    pub operating_cost_total: f64,
    pub cost_total: f64,
    /// subtotal − discount_total + shipping_fee
    pub total: f64,
    pub profit: f64,
    pub ordered_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One operating-cost preset applied to a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingCostLine {
    pub setting_id: i64,
    pub name: String,
    pub kind: CostKind,
    pub value_type: ValueType,
    pub value: f64,
    /// Resulting cost for the line
    pub amount: f64,
}

/// Order line item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name snapshot
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    /// Purchase price snapshot
    pub unit_cost: f64,
    pub discount_id: Option<i64>,
    pub discount_amount: f64,
    pub calculation_setting_ids: Vec<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub cost_breakdown: Vec<OperatingCostLine>,
    pub operating_cost: f64,
    /// unit_price × quantity
    pub gross_amount: f64,
    /// gross_amount − discount_amount
    pub line_total: f64,
    /// line_total − operating_cost
    pub net_amount: f64,
    pub profit: f64,
}

/// Order with items and customer name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItem>,
}

/// Line item input for create/preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i32,
    /// Overrides the product's current price
    pub unit_price: Option<f64>,
    pub discount_id: Option<i64>,
    /// `None` applies the default presets, `Some([])` applies none
    pub calculation_setting_ids: Option<Vec<i64>>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: Option<i64>,
    pub items: Vec<OrderItemInput>,
    pub shipping_fee: Option<f64>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    /// Defaults to now
    pub ordered_at: Option<i64>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
}
