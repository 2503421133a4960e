//! Category endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::request::PaginationQuery;
use shared::response::PaginatedResponse;
use shared::util::slugify;

use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};

use super::{ApiResult, conflict};

const SLUG_CONSTRAINT: &str = "categories_slug_key";

/// Slugify an explicit slug, or the name when none is given
fn resolve_slug(slug: Option<&str>, name: &str) -> Result<String, AppError> {
    let slug = slugify(slug.unwrap_or(name));
    if slug.is_empty() {
        return Err(AppError::field_error(
            ErrorCode::InvalidFormat,
            "slug",
            "slug must contain at least one ASCII letter or digit",
        ));
    }
    Ok(slug)
}

fn validate_common(
    description: &Option<String>,
    image_url: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Category>> {
    let page = query.page();
    let search = query.search_pattern();
    let (rows, total) = db::category::list_categories(&state.pool, search.as_deref(), page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, total, page)))
}

/// GET /api/admin/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Category> {
    let category = db::category::get_category(&state.pool, id)
        .await?
        .ok_or(ErrorCode::CategoryNotFound)?;
    Ok(Json(category))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(data): Json<CategoryCreate>,
) -> ApiResult<Category> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_common(&data.description, &data.image_url)?;
    let slug = resolve_slug(data.slug.as_deref(), &data.name)?;

    let category = db::category::create_category(&state.pool, &data, &slug)
        .await
        .map_err(conflict(SLUG_CONSTRAINT, ErrorCode::CategorySlugExists))?;

    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok(Json(category))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut data): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_common(&data.description, &data.image_url)?;
    if let Some(slug) = data.slug.take() {
        data.slug = Some(resolve_slug(Some(slug.as_str()), "")?);
    }

    let category = db::category::update_category(&state.pool, id, &data)
        .await
        .map_err(conflict(SLUG_CONSTRAINT, ErrorCode::CategorySlugExists))?
        .ok_or(ErrorCode::CategoryNotFound)?;
    Ok(Json(category))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::category::category_exists(&state.pool, id).await? {
        return Err(ErrorCode::CategoryNotFound.into());
    }
    let products = db::category::count_products(&state.pool, id).await?;
    if products > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasProducts)
            .with_detail("product_count", products)
            .into());
    }

    let deleted = db::category::soft_delete_category(&state.pool, id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(Json(deleted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(None, "Tea & Coffee").unwrap(), "tea-coffee");
        assert_eq!(resolve_slug(Some("Hot Drinks"), "ignored").unwrap(), "hot-drinks");
        let err = resolve_slug(Some("!!!"), "Tea").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
