//! Product cost setting database operations
//!
//! At most one live setting is the default; marking one clears the others
//! in the same transaction. `product_cost_settings_default_key` backs this up.

use shared::models::{ProductCostSetting, ProductCostSettingCreate, ProductCostSettingUpdate};
use sqlx::{PgPool, Postgres, Transaction};

use super::BoxError;

/// Serialize default changes: a second writer waits here and then sees the
/// first writer's row when it clears the old default.
async fn lock_for_default_change(tx: &mut Transaction<'_, Postgres>) -> Result<(), BoxError> {
    sqlx::query("LOCK TABLE product_cost_settings IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn list_product_cost_settings(pool: &PgPool) -> Result<Vec<ProductCostSetting>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, advertising, packaging, shipping, personnel, rent, freeship,
               profit_margin, is_default, created_at, updated_at
        FROM product_cost_settings
        WHERE deleted_at IS NULL
        ORDER BY is_default DESC, name, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_product_cost_setting(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ProductCostSetting>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, name, advertising, packaging, shipping, personnel, rent, freeship,
               profit_margin, is_default, created_at, updated_at
        FROM product_cost_settings
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_default_product_cost_setting(
    pool: &PgPool,
) -> Result<Option<ProductCostSetting>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, name, advertising, packaging, shipping, personnel, rent, freeship,
               profit_margin, is_default, created_at, updated_at
        FROM product_cost_settings
        WHERE is_default = TRUE AND deleted_at IS NULL
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create_product_cost_setting(
    pool: &PgPool,
    data: &ProductCostSettingCreate,
) -> Result<ProductCostSetting, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let is_default = data.is_default.unwrap_or(false);

    let mut tx = pool.begin().await?;

    if is_default {
        lock_for_default_change(&mut tx).await?;
        sqlx::query(
            "UPDATE product_cost_settings SET is_default = FALSE, updated_at = $1 WHERE is_default = TRUE AND deleted_at IS NULL",
        )
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    let row = sqlx::query_as(
        r#"
        INSERT INTO product_cost_settings (
            id, name, advertising, packaging, shipping, personnel, rent, freeship,
            profit_margin, is_default, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING id, name, advertising, packaging, shipping, personnel, rent, freeship,
                  profit_margin, is_default, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.advertising)
    .bind(data.packaging)
    .bind(data.shipping)
    .bind(data.personnel)
    .bind(data.rent)
    .bind(data.freeship)
    .bind(data.profit_margin)
    .bind(is_default)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

pub async fn update_product_cost_setting(
    pool: &PgPool,
    id: i64,
    data: &ProductCostSettingUpdate,
) -> Result<Option<ProductCostSetting>, BoxError> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if data.is_default == Some(true) {
        lock_for_default_change(&mut tx).await?;
        sqlx::query(
            "UPDATE product_cost_settings SET is_default = FALSE, updated_at = $1 WHERE is_default = TRUE AND id <> $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    let row = sqlx::query_as(
        r#"
        UPDATE product_cost_settings SET
            name = COALESCE($1, name),
            advertising = COALESCE($2, advertising),
            packaging = COALESCE($3, packaging),
            shipping = COALESCE($4, shipping),
            personnel = COALESCE($5, personnel),
            rent = COALESCE($6, rent),
            freeship = COALESCE($7, freeship),
            profit_margin = COALESCE($8, profit_margin),
            is_default = COALESCE($9, is_default),
            updated_at = $10
        WHERE id = $11 AND deleted_at IS NULL
        RETURNING id, name, advertising, packaging, shipping, personnel, rent, freeship,
                  profit_margin, is_default, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.advertising)
    .bind(data.packaging)
    .bind(data.shipping)
    .bind(data.personnel)
    .bind(data.rent)
    .bind(data.freeship)
    .bind(data.profit_margin)
    .bind(data.is_default)
    .bind(now)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    // Nothing updated: roll back the default reset too
    if row.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(row)
}

pub async fn soft_delete_product_cost_setting(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product_cost_settings SET deleted_at = $1, updated_at = $1, is_default = FALSE WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
