//! Category database operations

use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::request::Page;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_categories(
    pool: &PgPool,
    search: Option<&str>,
    page: Page,
) -> Result<(Vec<Category>, i64), BoxError> {
    let rows: Vec<Category> = sqlx::query_as(
        r#"
        SELECT id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        FROM categories
        WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1)
        ORDER BY sort_order, id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(search)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1)",
    )
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

/// Active categories for the storefront
pub async fn list_active_categories(pool: &PgPool) -> Result<Vec<Category>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        FROM categories
        WHERE deleted_at IS NULL AND is_active = TRUE
        ORDER BY sort_order, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_category(pool: &PgPool, id: i64) -> Result<Option<Category>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        FROM categories
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn category_exists(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create_category(
    pool: &PgPool,
    data: &CategoryCreate,
    slug: &str,
) -> Result<Category, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let row = sqlx::query_as(
        r#"
        INSERT INTO categories (
            id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(slug)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_category(
    pool: &PgPool,
    id: i64,
    data: &CategoryUpdate,
) -> Result<Option<Category>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        UPDATE categories SET
            name = COALESCE($1, name),
            slug = COALESCE($2, slug),
            description = COALESCE($3, description),
            image_url = COALESCE($4, image_url),
            sort_order = COALESCE($5, sort_order),
            is_active = COALESCE($6, is_active),
            updated_at = $7
        WHERE id = $8 AND deleted_at IS NULL
        RETURNING id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.slug)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Live products still assigned to the category
pub async fn count_products(pool: &PgPool, id: i64) -> Result<i64, BoxError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products WHERE category_id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Returns `false` when the category was not found
pub async fn soft_delete_category(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE categories SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
