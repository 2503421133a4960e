//! Invoice document and export endpoints

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use http::header;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderItem, OrderStatus};

use crate::db;
use crate::error::ServiceError;
use crate::invoice::{Invoice, build_invoice, export_zip};
use crate::reports::ReportRange;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/admin/orders/{id}/invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Invoice> {
    let order = db::order::get_order(&state.pool, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;
    let items = db::order::list_items(&state.pool, id).await?;
    let customer = match order.customer_id {
        Some(customer_id) => db::customer::get_customers_by_ids(&state.pool, &[customer_id])
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    Ok(Json(build_invoice(&order, customer.as_ref(), &items)))
}

/// GET /api/admin/invoices/export query
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// GET /api/admin/invoices/export
///
/// ZIP with `invoices.csv` and `invoice_lines.csv`.
pub async fn export_invoices(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ServiceError> {
    let range = ReportRange::resolve(query.from, query.to, shared::util::now_millis())?;

    let orders =
        db::order::list_orders_for_export(&state.pool, range.from, range.to, query.status).await?;
    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut customer_ids: Vec<i64> = orders.iter().filter_map(|o| o.customer_id).collect();
    customer_ids.sort_unstable();
    customer_ids.dedup();

    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in db::order::list_items_for_orders(&state.pool, &order_ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let customers: HashMap<_, _> = db::customer::get_customers_by_ids(&state.pool, &customer_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let invoices: Vec<Invoice> = orders
        .iter()
        .map(|order| {
            let customer = order.customer_id.and_then(|id| customers.get(&id));
            let items = items_by_order
                .get(&order.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            build_invoice(order, customer, items)
        })
        .collect();

    let archive = export_zip(&invoices).map_err(|e| {
        tracing::error!("Invoice export failed: {e}");
        AppError::new(ErrorCode::ExportFailed)
    })?;

    tracing::info!(invoices = invoices.len(), bytes = archive.len(), "Invoice export generated");

    let filename = format!("invoices-{}-{}.zip", range.from, range.to);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        archive,
    )
        .into_response())
}
