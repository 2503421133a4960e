//! Data models
//!
//! Shared between the back-office service and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (Postgres BIGINT), all timestamps Unix millis.

pub mod admin;
pub mod calculation_setting;
pub mod category;
pub mod customer;
pub mod discount;
pub mod order;
pub mod product;
pub mod product_cost_setting;
pub mod section;

// Re-exports
pub use admin::*;
pub use calculation_setting::*;
pub use category::*;
pub use customer::*;
pub use discount::*;
pub use order::*;
pub use product::*;
pub use product_cost_setting::*;
pub use section::*;
