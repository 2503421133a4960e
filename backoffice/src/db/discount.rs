//! Discount database operations

use shared::models::{Discount, DiscountCreate, DiscountUpdate};
use shared::request::Page;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_discounts(
    pool: &PgPool,
    search: Option<&str>,
    page: Page,
) -> Result<(Vec<Discount>, i64), BoxError> {
    let rows: Vec<Discount> = sqlx::query_as(
        r#"
        SELECT id, code, name, kind, value, min_order_amount, starts_at, ends_at,
               usage_limit, used_count, is_active, created_at, updated_at
        FROM discounts
        WHERE deleted_at IS NULL AND ($1::text IS NULL OR code ILIKE $1 OR name ILIKE $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(search)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM discounts WHERE deleted_at IS NULL AND ($1::text IS NULL OR code ILIKE $1 OR name ILIKE $1)",
    )
    .bind(search)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

pub async fn get_discount(pool: &PgPool, id: i64) -> Result<Option<Discount>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, code, name, kind, value, min_order_amount, starts_at, ends_at,
               usage_limit, used_count, is_active, created_at, updated_at
        FROM discounts
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lookup by code (stored uppercase)
pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Discount>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, code, name, kind, value, min_order_amount, starts_at, ends_at,
               usage_limit, used_count, is_active, created_at, updated_at
        FROM discounts
        WHERE code = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_discounts_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Discount>, BoxError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = sqlx::query_as(
        r#"
        SELECT id, code, name, kind, value, min_order_amount, starts_at, ends_at,
               usage_limit, used_count, is_active, created_at, updated_at
        FROM discounts
        WHERE id = ANY($1) AND deleted_at IS NULL
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `code` is the normalized (trimmed, uppercase) code
pub async fn create_discount(
    pool: &PgPool,
    data: &DiscountCreate,
    code: &str,
) -> Result<Discount, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let row = sqlx::query_as(
        r#"
        INSERT INTO discounts (
            id, code, name, kind, value, min_order_amount, starts_at, ends_at,
            usage_limit, used_count, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10, $11, $11)
        RETURNING id, code, name, kind, value, min_order_amount, starts_at, ends_at,
                  usage_limit, used_count, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(code)
    .bind(data.name.trim())
    .bind(data.kind)
    .bind(data.value)
    .bind(data.min_order_amount.unwrap_or(0.0))
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(data.usage_limit)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_discount(
    pool: &PgPool,
    id: i64,
    data: &DiscountUpdate,
    code: Option<&str>,
) -> Result<Option<Discount>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        UPDATE discounts SET
            code = COALESCE($1, code),
            name = COALESCE($2, name),
            kind = COALESCE($3, kind),
            value = COALESCE($4, value),
            min_order_amount = COALESCE($5, min_order_amount),
            starts_at = COALESCE($6, starts_at),
            ends_at = COALESCE($7, ends_at),
            usage_limit = COALESCE($8, usage_limit),
            is_active = COALESCE($9, is_active),
            updated_at = $10
        WHERE id = $11 AND deleted_at IS NULL
        RETURNING id, code, name, kind, value, min_order_amount, starts_at, ends_at,
                  usage_limit, used_count, is_active, created_at, updated_at
        "#,
    )
    .bind(code)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.kind)
    .bind(data.value)
    .bind(data.min_order_amount)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(data.usage_limit)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete_discount(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE discounts SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
