//! Homepage section Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A homepage section after merging stored settings over defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomepageSection {
    /// Stable tab key (`hero`, `featured_products`, ...)
    pub section_id: String,
    pub payload: Value,
    pub is_visible: bool,
    pub sort_order: i32,
    /// `None` when nothing is stored for the tab
    pub updated_at: Option<i64>,
}

/// Stored section row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SectionRecord {
    pub section_id: String,
    pub payload: Value,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
    pub updated_at: i64,
}

/// Update section payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionUpdate {
    /// Must be a JSON object
    pub payload: Value,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}
