//! Order endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Order, OrderCreate, OrderDetail, OrderStatus, OrderUpdate};
use shared::request::Page;
use shared::response::PaginatedResponse;

use crate::auth::AdminIdentity;
use crate::db;
use crate::db::order::OrderFilter;
use crate::services::order::{self as order_service, OrderQuote};
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank, validate_optional_text};

use super::ApiResult;

/// GET /api/admin/orders query
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
    /// Inclusive lower bound on `ordered_at` (Unix millis)
    pub from: Option<i64>,
    /// Exclusive upper bound on `ordered_at` (Unix millis)
    pub to: Option<i64>,
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<PaginatedResponse<Order>> {
    let page = Page::new(query.page, query.per_page);
    let filter = OrderFilter {
        status: query.status,
        customer_id: query.customer_id,
        from: query.from,
        to: query.to,
    };
    let (rows, total) = db::order::list_orders(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, total, page)))
}

/// GET /api/admin/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let detail = db::order::get_order_detail(&state.pool, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;
    Ok(Json(detail))
}

/// POST /api/admin/orders/preview
pub async fn preview_order(
    State(state): State<AppState>,
    Json(data): Json<OrderCreate>,
) -> ApiResult<OrderQuote> {
    let quote = order_service::quote_order(&state.pool, &data).await?;
    Ok(Json(quote))
}

/// POST /api/admin/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(data): Json<OrderCreate>,
) -> ApiResult<OrderDetail> {
    let order = order_service::create_order(&state.pool, &data).await?;
    tracing::debug!(order_id = order.id, admin_id = identity.admin_id, "Order placed by admin");

    let detail = db::order::get_order_detail(&state.pool, order.id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;
    Ok(Json(detail))
}

/// PUT /api/admin/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<OrderUpdate>,
) -> ApiResult<Order> {
    validate_optional_text(&data.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    let data = OrderUpdate {
        status: data.status,
        payment_method: non_blank(data.payment_method),
        note: data.note.map(|n| n.trim().to_string()),
    };

    let order = db::order::update_order(&state.pool, id, &data).await?;
    Ok(Json(order))
}

/// DELETE /api/admin/orders/{id}
///
/// Owner only; a non-cancelled order gives its stock back.
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    identity.require_owner()?;
    db::order::soft_delete_order(&state.pool, id).await?;
    tracing::info!(order_id = id, admin_id = identity.admin_id, "Order deleted");
    Ok(Json(true))
}
