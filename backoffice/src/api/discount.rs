//! Discount endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Discount, DiscountCheck, DiscountCreate, DiscountKind, DiscountUpdate};
use shared::request::PaginationQuery;
use shared::response::PaginatedResponse;

use crate::db;
use crate::pricing::{check_discount, discount_amount, to_decimal, to_f64};
use crate::state::AppState;
use crate::validation::{
    MAX_AMOUNT, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_required_text,
};

use super::{ApiResult, conflict};

const CODE_CONSTRAINT: &str = "discounts_code_key";

/// Codes are stored trimmed and uppercase
fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Percentage in (0, 100], fixed amount in (0, MAX_AMOUNT]
fn validate_value(kind: DiscountKind, value: f64) -> Result<(), AppError> {
    let valid = value.is_finite()
        && match kind {
            DiscountKind::Percentage => value > 0.0 && value <= 100.0,
            DiscountKind::Fixed => value > 0.0 && value <= MAX_AMOUNT,
        };
    if valid {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::DiscountInvalidValue).with_detail("value", value))
    }
}

fn validate_window(starts_at: Option<i64>, ends_at: Option<i64>) -> Result<(), AppError> {
    if let (Some(starts), Some(ends)) = (starts_at, ends_at)
        && starts >= ends
    {
        return Err(AppError::validation("starts_at must be before ends_at")
            .with_detail("field", "ends_at"));
    }
    Ok(())
}

fn validate_usage_limit(limit: Option<i32>) -> Result<(), AppError> {
    if limit.is_some_and(|l| l < 1) {
        return Err(AppError::field_error(
            ErrorCode::ValueOutOfRange,
            "usage_limit",
            "usage_limit must be at least 1",
        ));
    }
    Ok(())
}

/// GET /api/admin/discounts
pub async fn list_discounts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Discount>> {
    let page = query.page();
    let search = query.search_pattern();
    let (rows, total) = db::discount::list_discounts(&state.pool, search.as_deref(), page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, total, page)))
}

/// GET /api/admin/discounts/{id}
pub async fn get_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Discount> {
    let discount = db::discount::get_discount(&state.pool, id)
        .await?
        .ok_or(ErrorCode::DiscountNotFound)?;
    Ok(Json(discount))
}

/// POST /api/admin/discounts
pub async fn create_discount(
    State(state): State<AppState>,
    Json(data): Json<DiscountCreate>,
) -> ApiResult<Discount> {
    validate_required_text(&data.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_value(data.kind, data.value)?;
    if let Some(min) = data.min_order_amount {
        validate_amount(min, "min_order_amount")?;
    }
    validate_window(data.starts_at, data.ends_at)?;
    validate_usage_limit(data.usage_limit)?;

    let code = normalize_code(&data.code);
    let discount = db::discount::create_discount(&state.pool, &data, &code)
        .await
        .map_err(conflict(CODE_CONSTRAINT, ErrorCode::DiscountCodeExists))?;

    tracing::info!(discount_id = discount.id, code = %discount.code, "Discount created");
    Ok(Json(discount))
}

/// PUT /api/admin/discounts/{id}
pub async fn update_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<DiscountUpdate>,
) -> ApiResult<Discount> {
    let current = db::discount::get_discount(&state.pool, id)
        .await?
        .ok_or(ErrorCode::DiscountNotFound)?;

    if let Some(code) = &data.code {
        validate_required_text(code, "code", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    // Kind and value are validated as the pair the row will end up with
    validate_value(
        data.kind.unwrap_or(current.kind),
        data.value.unwrap_or(current.value),
    )?;
    if let Some(min) = data.min_order_amount {
        validate_amount(min, "min_order_amount")?;
    }
    validate_window(
        data.starts_at.or(current.starts_at),
        data.ends_at.or(current.ends_at),
    )?;
    validate_usage_limit(data.usage_limit)?;

    let code = data.code.as_deref().map(normalize_code);
    let discount = db::discount::update_discount(&state.pool, id, &data, code.as_deref())
        .await
        .map_err(conflict(CODE_CONSTRAINT, ErrorCode::DiscountCodeExists))?
        .ok_or(ErrorCode::DiscountNotFound)?;
    Ok(Json(discount))
}

/// DELETE /api/admin/discounts/{id}
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::discount::soft_delete_discount(&state.pool, id).await? {
        return Err(ErrorCode::DiscountNotFound.into());
    }
    tracing::info!(discount_id = id, "Discount deleted");
    Ok(Json(true))
}

/// GET /api/admin/discounts/validate query
#[derive(Debug, Deserialize)]
pub struct ValidateCodeQuery {
    pub code: String,
    #[serde(default)]
    pub subtotal: f64,
}

/// GET /api/admin/discounts/validate?code=&subtotal=
pub async fn validate_code(
    State(state): State<AppState>,
    Query(query): Query<ValidateCodeQuery>,
) -> ApiResult<DiscountCheck> {
    validate_amount(query.subtotal, "subtotal")?;
    let code = normalize_code(&query.code);
    let discount = db::discount::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DiscountNotFound).with_detail("code", code))?;

    check_discount(&discount, query.subtotal, shared::util::now_millis())?;

    let amount = discount_amount(discount.kind, discount.value, to_decimal(query.subtotal))?;
    Ok(Json(DiscountCheck {
        subtotal: query.subtotal,
        discount_amount: to_f64(amount),
        discount,
    }))
}
