//! Product cost setting Model

use serde::{Deserialize, Serialize};

/// Named cost profile used to suggest a retail price.
///
/// Cost fields are fixed amounts per unit; `profit_margin` is a percent
/// markup over the summed base cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductCostSetting {
    pub id: i64,
    pub name: String,
    pub advertising: f64,
    pub packaging: f64,
    pub shipping: f64,
    pub personnel: f64,
    pub rent: f64,
    pub freeship: f64,
    pub profit_margin: f64,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product cost setting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCostSettingCreate {
    pub name: String,
    #[serde(default)]
    pub advertising: f64,
    #[serde(default)]
    pub packaging: f64,
    #[serde(default)]
    pub shipping: f64,
    #[serde(default)]
    pub personnel: f64,
    #[serde(default)]
    pub rent: f64,
    #[serde(default)]
    pub freeship: f64,
    #[serde(default)]
    pub profit_margin: f64,
    pub is_default: Option<bool>,
}

/// Update product cost setting payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCostSettingUpdate {
    pub name: Option<String>,
    pub advertising: Option<f64>,
    pub packaging: Option<f64>,
    pub shipping: Option<f64>,
    pub personnel: Option<f64>,
    pub rent: Option<f64>,
    pub freeship: Option<f64>,
    pub profit_margin: Option<f64>,
    pub is_default: Option<bool>,
}
