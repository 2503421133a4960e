//! Public storefront endpoints (no authentication, no cost fields)

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{Category, HomepageSection, ProductStatus, PublicProduct};
use shared::request::{Page, like_pattern};
use shared::response::PaginatedResponse;
use sqlx::PgPool;

use crate::db;
use crate::db::product::ProductFilter;
use crate::error::ServiceResult;
use crate::sections::{
    attach_items, id_list, item_limit, merge_sections, order_by_ids, select_categories,
};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/storefront/homepage
///
/// Visible sections only, catalog tabs filled with live rows.
pub async fn homepage(State(state): State<AppState>) -> ApiResult<Vec<HomepageSection>> {
    let records = db::section::list_sections(&state.pool).await?;
    let mut sections: Vec<HomepageSection> = merge_sections(&records)
        .into_iter()
        .filter(|s| s.is_visible)
        .collect();

    for section in &mut sections {
        match section.section_id.as_str() {
            "categories" => {
                let active = db::category::list_active_categories(&state.pool).await?;
                let picked = select_categories(&section.payload, active);
                attach_items(section, &picked);
            }
            "featured_products" => {
                let products = featured_products(&state.pool, &section.payload).await?;
                attach_items(section, &products);
            }
            _ => {}
        }
    }

    Ok(Json(sections))
}

async fn featured_products(
    pool: &PgPool,
    payload: &serde_json::Value,
) -> ServiceResult<Vec<PublicProduct>> {
    let ids = id_list(payload, "product_ids");
    let limit = item_limit(payload, 8);

    let products = if ids.is_empty() {
        db::product::list_latest_available(pool, limit as i64).await?
    } else {
        let rows = db::product::get_products_by_ids(pool, &ids)
            .await?
            .into_iter()
            .filter(|p| p.status == ProductStatus::Available)
            .collect();
        order_by_ids(rows, &ids, |p| p.id)
    };

    Ok(products
        .into_iter()
        .take(limit)
        .map(PublicProduct::from)
        .collect())
}

/// GET /api/storefront/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = db::category::list_active_categories(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/storefront/products query
#[derive(Debug, Default, Deserialize)]
pub struct StorefrontProductQuery {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/storefront/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<StorefrontProductQuery>,
) -> ApiResult<PaginatedResponse<PublicProduct>> {
    let page = Page::new(query.page, query.per_page);
    let search = query.search.as_deref().and_then(like_pattern);
    let filter = ProductFilter {
        category_id: query.category_id,
        search: search.as_deref(),
        public_only: true,
        ..Default::default()
    };
    let (rows, total) = db::product::list_products(&state.pool, &filter, page).await?;
    Ok(Json(
        PaginatedResponse::from_page(rows, total, page).map(PublicProduct::from),
    ))
}
