//! Product database operations

use shared::models::{Product, ProductCreate, ProductStatus, ProductUpdate};
use shared::request::Page;
use sqlx::PgPool;

use super::BoxError;

/// List filters
#[derive(Debug, Default)]
pub struct ProductFilter<'a> {
    pub category_id: Option<i64>,
    pub status: Option<ProductStatus>,
    pub search: Option<&'a str>,
    /// Storefront listing: skip hidden products
    pub public_only: bool,
}

pub async fn list_products(
    pool: &PgPool,
    filter: &ProductFilter<'_>,
    page: Page,
) -> Result<(Vec<Product>, i64), BoxError> {
    let rows: Vec<Product> = sqlx::query_as(
        r#"
        SELECT id, category_id, name, sku, description, image_url, purchase_price, price,
               stock, status, cost_setting_id, created_at, updated_at
        FROM products
        WHERE deleted_at IS NULL
          AND ($1::bigint IS NULL OR category_id = $1)
          AND ($2::product_status IS NULL OR status = $2)
          AND ($3::text IS NULL OR name ILIKE $3 OR sku ILIKE $3)
          AND (NOT $4 OR status <> 'hidden')
        ORDER BY created_at DESC, id DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(filter.category_id)
    .bind(filter.status)
    .bind(filter.search)
    .bind(filter.public_only)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM products
        WHERE deleted_at IS NULL
          AND ($1::bigint IS NULL OR category_id = $1)
          AND ($2::product_status IS NULL OR status = $2)
          AND ($3::text IS NULL OR name ILIKE $3 OR sku ILIKE $3)
          AND (NOT $4 OR status <> 'hidden')
        "#,
    )
    .bind(filter.category_id)
    .bind(filter.status)
    .bind(filter.search)
    .bind(filter.public_only)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, category_id, name, sku, description, image_url, purchase_price, price,
               stock, status, cost_setting_id, created_at, updated_at
        FROM products
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_products_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Product>, BoxError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = sqlx::query_as(
        r#"
        SELECT id, category_id, name, sku, description, image_url, purchase_price, price,
               stock, status, cost_setting_id, created_at, updated_at
        FROM products
        WHERE id = ANY($1) AND deleted_at IS NULL
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Newest available products, for the storefront
pub async fn list_latest_available(pool: &PgPool, limit: i64) -> Result<Vec<Product>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, category_id, name, sku, description, image_url, purchase_price, price,
               stock, status, cost_setting_id, created_at, updated_at
        FROM products
        WHERE deleted_at IS NULL AND status = 'available'
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_product(
    pool: &PgPool,
    data: &ProductCreate,
    price: f64,
    status: ProductStatus,
) -> Result<Product, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let row = sqlx::query_as(
        r#"
        INSERT INTO products (
            id, category_id, name, sku, description, image_url, purchase_price, price,
            stock, status, cost_setting_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING id, category_id, name, sku, description, image_url, purchase_price, price,
                  stock, status, cost_setting_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(&data.sku)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.purchase_price)
    .bind(price)
    .bind(data.stock)
    .bind(status)
    .bind(data.cost_setting_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// `status` is the already-resolved status (stock rule applied by the caller)
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
    status: Option<ProductStatus>,
) -> Result<Option<Product>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        UPDATE products SET
            name = COALESCE($1, name),
            category_id = COALESCE($2, category_id),
            sku = COALESCE($3, sku),
            description = COALESCE($4, description),
            image_url = COALESCE($5, image_url),
            purchase_price = COALESCE($6, purchase_price),
            price = COALESCE($7, price),
            stock = COALESCE($8, stock),
            status = COALESCE($9, status),
            cost_setting_id = COALESCE($10, cost_setting_id),
            updated_at = $11
        WHERE id = $12 AND deleted_at IS NULL
        RETURNING id, category_id, name, sku, description, image_url, purchase_price, price,
                  stock, status, cost_setting_id, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.category_id)
    .bind(&data.sku)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.purchase_price)
    .bind(data.price)
    .bind(data.stock)
    .bind(status)
    .bind(data.cost_setting_id)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete_product(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
