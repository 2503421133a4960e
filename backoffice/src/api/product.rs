//! Product endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductCostSetting, ProductCreate, ProductStatus, ProductUpdate};
use shared::request::{Page, like_pattern};
use shared::response::PaginatedResponse;
use sqlx::PgPool;

use crate::db;
use crate::db::product::ProductFilter;
use crate::error::ServiceResult;
use crate::pricing::{SuggestedPrice, suggest_price};
use crate::state::AppState;
use crate::validation::{
    MAX_AMOUNT, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, is_valid_amount,
    non_blank, validate_optional_text, validate_required_text,
};

use super::{ApiResult, conflict};

const SKU_CONSTRAINT: &str = "products_sku_key";

/// GET /api/admin/products query
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<ProductStatus>,
}

fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !is_valid_amount(value) {
        return Err(AppError::field_error(
            ErrorCode::ProductInvalidPrice,
            field,
            format!("{field} must be an amount between 0 and {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::field_error(
            ErrorCode::ValueOutOfRange,
            "stock",
            "stock must not be negative",
        ));
    }
    Ok(())
}

fn validate_text_fields(
    sku: &Option<String>,
    description: &Option<String>,
    image_url: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
    Ok(())
}

async fn ensure_category(pool: &PgPool, category_id: Option<i64>) -> ServiceResult<()> {
    if let Some(id) = category_id
        && !db::category::category_exists(pool, id).await?
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound)
            .with_detail("category_id", id)
            .into());
    }
    Ok(())
}

async fn load_cost_setting(pool: &PgPool, id: i64) -> ServiceResult<ProductCostSetting> {
    let setting = db::product_cost_setting::get_product_cost_setting(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ProductCostSettingNotFound).with_detail("cost_setting_id", id)
        })?;
    Ok(setting)
}

/// GET /api/admin/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<Product>> {
    let page = Page::new(query.page, query.per_page);
    let search = query.search.as_deref().and_then(like_pattern);
    let filter = ProductFilter {
        category_id: query.category_id,
        status: query.status,
        search: search.as_deref(),
        public_only: false,
    };
    let (rows, total) = db::product::list_products(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, total, page)))
}

/// GET /api/admin/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    let product = db::product::get_product(&state.pool, id)
        .await?
        .ok_or(ErrorCode::ProductNotFound)?;
    Ok(Json(product))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(data): Json<ProductCreate>,
) -> ApiResult<Product> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_text_fields(&data.sku, &data.description, &data.image_url)?;
    validate_price(data.purchase_price, "purchase_price")?;
    if let Some(price) = data.price {
        validate_price(price, "price")?;
    }
    validate_stock(data.stock)?;
    ensure_category(&state.pool, data.category_id).await?;

    let cost_setting = match data.cost_setting_id {
        Some(id) => Some(load_cost_setting(&state.pool, id).await?),
        None => None,
    };

    let price = match (data.price, &cost_setting) {
        (Some(price), _) => price,
        (None, Some(setting)) => suggest_price(data.purchase_price, setting)?.suggested_price,
        (None, None) => {
            return Err(AppError::field_error(
                ErrorCode::RequiredField,
                "price",
                "price is required when no cost setting is given",
            )
            .into());
        }
    };

    let status = data
        .status
        .unwrap_or(ProductStatus::Available)
        .for_stock(data.stock);

    let data = ProductCreate {
        sku: non_blank(data.sku),
        description: non_blank(data.description),
        image_url: non_blank(data.image_url),
        ..data
    };

    let product = db::product::create_product(&state.pool, &data, price, status)
        .await
        .map_err(conflict(SKU_CONSTRAINT, ErrorCode::ProductSkuExists))?;

    tracing::info!(product_id = product.id, price = product.price, "Product created");
    Ok(Json(product))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_text_fields(&data.sku, &data.description, &data.image_url)?;
    if let Some(price) = data.purchase_price {
        validate_price(price, "purchase_price")?;
    }
    if let Some(price) = data.price {
        validate_price(price, "price")?;
    }
    if let Some(stock) = data.stock {
        validate_stock(stock)?;
    }
    ensure_category(&state.pool, data.category_id).await?;
    if let Some(setting_id) = data.cost_setting_id {
        load_cost_setting(&state.pool, setting_id).await?;
    }

    let current = db::product::get_product(&state.pool, id)
        .await?
        .ok_or(ErrorCode::ProductNotFound)?;
    let status = data
        .status
        .unwrap_or(current.status)
        .for_stock(data.stock.unwrap_or(current.stock));

    let data = ProductUpdate {
        sku: non_blank(data.sku),
        ..data
    };

    let product = db::product::update_product(&state.pool, id, &data, Some(status))
        .await
        .map_err(conflict(SKU_CONSTRAINT, ErrorCode::ProductSkuExists))?
        .ok_or(ErrorCode::ProductNotFound)?;
    Ok(Json(product))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::product::soft_delete_product(&state.pool, id).await? {
        return Err(ErrorCode::ProductNotFound.into());
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}

/// GET /api/admin/products/{id}/suggested-price query
#[derive(Debug, Deserialize)]
pub struct SuggestedPriceQuery {
    pub cost_setting_id: Option<i64>,
}

/// GET /api/admin/products/{id}/suggested-price
///
/// Uses the requested cost setting, else the product's own, else the default.
pub async fn suggested_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<SuggestedPriceQuery>,
) -> ApiResult<SuggestedPrice> {
    let product = db::product::get_product(&state.pool, id)
        .await?
        .ok_or(ErrorCode::ProductNotFound)?;

    let setting = match query.cost_setting_id.or(product.cost_setting_id) {
        Some(setting_id) => load_cost_setting(&state.pool, setting_id).await?,
        None => db::product_cost_setting::get_default_product_cost_setting(&state.pool)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductCostSettingNotFound,
                    "No product cost setting selected and no default configured",
                )
            })?,
    };

    Ok(Json(suggest_price(product.purchase_price, &setting)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(0.0, "price").is_ok());
        assert!(validate_price(MAX_AMOUNT, "price").is_ok());
        for value in [-1.0, f64::INFINITY, 1e28] {
            let err = validate_price(value, "purchase_price").unwrap_err();
            assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
            assert_eq!(err.details.unwrap()["field"], "purchase_price");
        }
    }
}
