//! Database access layer
//!
//! Every business table is soft-deleted: reads filter `deleted_at IS NULL`,
//! deletes stamp `deleted_at`.

pub mod admins;
pub mod calculation_setting;
pub mod category;
pub mod customer;
pub mod discount;
pub mod order;
pub mod product;
pub mod product_cost_setting;
pub mod report;
pub mod section;

pub(crate) use crate::error::BoxError;
