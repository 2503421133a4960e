//! Calculation settings and product cost settings
//!
//! Reads are open to every admin; changes need the owner role.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CalculationSetting, CalculationSettingCreate, CalculationSettingUpdate, ProductCostSetting,
    ProductCostSettingCreate, ProductCostSettingUpdate, ValueType,
};

use crate::auth::AdminIdentity;
use crate::db;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_amount, validate_percentage, validate_required_text};

use super::ApiResult;

fn validate_preset_value(value_type: ValueType, value: f64) -> Result<(), AppError> {
    match value_type {
        ValueType::Fixed => validate_amount(value, "value"),
        ValueType::Percentage => validate_percentage(value, "value"),
    }
}

// ── Calculation settings ────────────────────────────────────────────

/// GET /api/admin/calculation-settings
pub async fn list_calculation_settings(
    State(state): State<AppState>,
) -> ApiResult<Vec<CalculationSetting>> {
    let rows = db::calculation_setting::list_calculation_settings(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/admin/calculation-settings/{id}
pub async fn get_calculation_setting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CalculationSetting> {
    let row = db::calculation_setting::get_calculation_setting(&state.pool, id)
        .await?
        .ok_or(ErrorCode::CalculationSettingNotFound)?;
    Ok(Json(row))
}

/// POST /api/admin/calculation-settings
pub async fn create_calculation_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(data): Json<CalculationSettingCreate>,
) -> ApiResult<CalculationSetting> {
    identity.require_owner()?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_preset_value(data.value_type, data.value)?;

    let row = db::calculation_setting::create_calculation_setting(&state.pool, &data).await?;
    tracing::info!(setting_id = row.id, kind = row.kind.as_str(), "Calculation setting created");
    Ok(Json(row))
}

/// PUT /api/admin/calculation-settings/{id}
pub async fn update_calculation_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<CalculationSettingUpdate>,
) -> ApiResult<CalculationSetting> {
    identity.require_owner()?;
    let current = db::calculation_setting::get_calculation_setting(&state.pool, id)
        .await?
        .ok_or(ErrorCode::CalculationSettingNotFound)?;

    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_preset_value(
        data.value_type.unwrap_or(current.value_type),
        data.value.unwrap_or(current.value),
    )?;

    let row = db::calculation_setting::update_calculation_setting(&state.pool, id, &data)
        .await?
        .ok_or(ErrorCode::CalculationSettingNotFound)?;
    Ok(Json(row))
}

/// DELETE /api/admin/calculation-settings/{id}
///
/// Line items keep their stored breakdown.
pub async fn delete_calculation_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    identity.require_owner()?;
    if !db::calculation_setting::soft_delete_calculation_setting(&state.pool, id).await? {
        return Err(ErrorCode::CalculationSettingNotFound.into());
    }
    tracing::info!(setting_id = id, "Calculation setting deleted");
    Ok(Json(true))
}

// ── Product cost settings ───────────────────────────────────────────

fn validate_cost_amounts(amounts: &[(Option<f64>, &str)]) -> Result<(), AppError> {
    for (value, field) in amounts {
        if let Some(value) = value {
            validate_amount(*value, field)?;
        }
    }
    Ok(())
}

/// GET /api/admin/product-cost-settings
pub async fn list_product_cost_settings(
    State(state): State<AppState>,
) -> ApiResult<Vec<ProductCostSetting>> {
    let rows = db::product_cost_setting::list_product_cost_settings(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/admin/product-cost-settings/{id}
pub async fn get_product_cost_setting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductCostSetting> {
    let row = db::product_cost_setting::get_product_cost_setting(&state.pool, id)
        .await?
        .ok_or(ErrorCode::ProductCostSettingNotFound)?;
    Ok(Json(row))
}

/// POST /api/admin/product-cost-settings
pub async fn create_product_cost_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(data): Json<ProductCostSettingCreate>,
) -> ApiResult<ProductCostSetting> {
    identity.require_owner()?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_cost_amounts(&[
        (Some(data.advertising), "advertising"),
        (Some(data.packaging), "packaging"),
        (Some(data.shipping), "shipping"),
        (Some(data.personnel), "personnel"),
        (Some(data.rent), "rent"),
        (Some(data.freeship), "freeship"),
        (Some(data.profit_margin), "profit_margin"),
    ])?;

    let row = db::product_cost_setting::create_product_cost_setting(&state.pool, &data).await?;
    tracing::info!(setting_id = row.id, is_default = row.is_default, "Product cost setting created");
    Ok(Json(row))
}

/// PUT /api/admin/product-cost-settings/{id}
pub async fn update_product_cost_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<ProductCostSettingUpdate>,
) -> ApiResult<ProductCostSetting> {
    identity.require_owner()?;
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_cost_amounts(&[
        (data.advertising, "advertising"),
        (data.packaging, "packaging"),
        (data.shipping, "shipping"),
        (data.personnel, "personnel"),
        (data.rent, "rent"),
        (data.freeship, "freeship"),
        (data.profit_margin, "profit_margin"),
    ])?;

    let row = db::product_cost_setting::update_product_cost_setting(&state.pool, id, &data)
        .await?
        .ok_or(ErrorCode::ProductCostSettingNotFound)?;
    Ok(Json(row))
}

/// DELETE /api/admin/product-cost-settings/{id}
pub async fn delete_product_cost_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    identity.require_owner()?;
    if !db::product_cost_setting::soft_delete_product_cost_setting(&state.pool, id).await? {
        return Err(ErrorCode::ProductCostSettingNotFound.into());
    }
    tracing::info!(setting_id = id, "Product cost setting deleted");
    Ok(Json(true))
}
