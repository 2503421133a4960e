//! Reporting endpoints
//!
//! Rows for the range are loaded once per request and rolled up in memory.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db;
use crate::reports::{
    self, CustomerSpend, DailyPoint, OperatingCostReport, ProductSales, ReportRange, SalesSummary,
    StatusBucket,
};
use crate::state::AppState;

use super::ApiResult;

const DEFAULT_TOP_LIMIT: usize = 10;
const MAX_TOP_LIMIT: usize = 100;

/// Report query: `[from, to)` in Unix millis, optional `limit` for top lists
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: Option<usize>,
}

impl ReportQuery {
    fn range(&self) -> Result<ReportRange, shared::error::AppError> {
        ReportRange::resolve(self.from, self.to, shared::util::now_millis())
    }

    fn top_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT)
    }
}

/// GET /api/admin/reports/summary
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<SalesSummary> {
    let range = query.range()?;
    let orders = db::report::load_orders(&state.pool, range).await?;
    let items = db::report::load_items(&state.pool, range).await?;
    let new_customers =
        db::customer::count_created_between(&state.pool, range.from, range.to).await?;
    Ok(Json(reports::summary(range, &orders, &items, new_customers)))
}

/// GET /api/admin/reports/daily
pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Vec<DailyPoint>> {
    let range = query.range()?;
    let orders = db::report::load_orders(&state.pool, range).await?;
    Ok(Json(reports::daily(range, &orders)))
}

/// GET /api/admin/reports/top-products
pub async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Vec<ProductSales>> {
    let range = query.range()?;
    let items = db::report::load_items(&state.pool, range).await?;
    Ok(Json(reports::top_products(&items, query.top_limit())))
}

/// GET /api/admin/reports/top-customers
pub async fn top_customers(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Vec<CustomerSpend>> {
    let range = query.range()?;
    let orders = db::report::load_orders(&state.pool, range).await?;
    Ok(Json(reports::top_customers(&orders, query.top_limit())))
}

/// GET /api/admin/reports/status-breakdown
pub async fn status_breakdown(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Vec<StatusBucket>> {
    let range = query.range()?;
    let orders = db::report::load_orders(&state.pool, range).await?;
    Ok(Json(reports::status_breakdown(&orders)))
}

/// GET /api/admin/reports/operating-costs
pub async fn operating_costs(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<OperatingCostReport> {
    let range = query.range()?;
    let items = db::report::load_items(&state.pool, range).await?;
    Ok(Json(reports::operating_costs(&items)))
}
