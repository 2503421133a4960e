//! Calculation setting (operating-cost preset) Model

use serde::{Deserialize, Serialize};

/// Operating cost category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "cost_kind", rename_all = "snake_case"))]
pub enum CostKind {
    Advertising,
    Packaging,
    Shipping,
    Personnel,
    Rent,
    Freeship,
}

impl CostKind {
    pub const ALL: [CostKind; 6] = [
        Self::Advertising,
        Self::Packaging,
        Self::Shipping,
        Self::Personnel,
        Self::Rent,
        Self::Freeship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advertising => "advertising",
            Self::Packaging => "packaging",
            Self::Shipping => "shipping",
            Self::Personnel => "personnel",
            Self::Rent => "rent",
            Self::Freeship => "freeship",
        }
    }
}

/// How a preset value is applied to a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "value_type", rename_all = "snake_case"))]
pub enum ValueType {
    /// Amount per unit sold
    Fixed,
    /// Percent of line revenue
    Percentage,
}

/// Calculation setting entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CalculationSetting {
    pub id: i64,
    pub name: String,
    pub kind: CostKind,
    pub value_type: ValueType,
    pub value: f64,
    /// Applied to line items that select no presets
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create calculation setting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationSettingCreate {
    pub name: String,
    pub kind: CostKind,
    pub value_type: ValueType,
    pub value: f64,
    pub is_default: Option<bool>,
}

/// Update calculation setting payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationSettingUpdate {
    pub name: Option<String>,
    pub kind: Option<CostKind>,
    pub value_type: Option<ValueType>,
    pub value: Option<f64>,
    pub is_default: Option<bool>,
}
