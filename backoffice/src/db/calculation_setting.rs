//! Calculation setting (operating-cost preset) database operations

use shared::models::{CalculationSetting, CalculationSettingCreate, CalculationSettingUpdate};
use sqlx::PgPool;

use super::BoxError;

pub async fn list_calculation_settings(pool: &PgPool) -> Result<Vec<CalculationSetting>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, kind, value_type, value, is_default, created_at, updated_at
        FROM calculation_settings
        WHERE deleted_at IS NULL
        ORDER BY kind, name, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_calculation_setting(
    pool: &PgPool,
    id: i64,
) -> Result<Option<CalculationSetting>, BoxError> {
    let row = sqlx::query_as(
        r#"
        SELECT id, name, kind, value_type, value, is_default, created_at, updated_at
        FROM calculation_settings
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_calculation_settings_by_ids(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<CalculationSetting>, BoxError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, kind, value_type, value, is_default, created_at, updated_at
        FROM calculation_settings
        WHERE id = ANY($1) AND deleted_at IS NULL
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Presets applied to line items that select none
pub async fn list_default_calculation_settings(
    pool: &PgPool,
) -> Result<Vec<CalculationSetting>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, name, kind, value_type, value, is_default, created_at, updated_at
        FROM calculation_settings
        WHERE is_default = TRUE AND deleted_at IS NULL
        ORDER BY kind, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_calculation_setting(
    pool: &PgPool,
    data: &CalculationSettingCreate,
) -> Result<CalculationSetting, BoxError> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let row = sqlx::query_as(
        r#"
        INSERT INTO calculation_settings (
            id, name, kind, value_type, value, is_default, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, name, kind, value_type, value, is_default, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.kind)
    .bind(data.value_type)
    .bind(data.value)
    .bind(data.is_default.unwrap_or(false))
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_calculation_setting(
    pool: &PgPool,
    id: i64,
    data: &CalculationSettingUpdate,
) -> Result<Option<CalculationSetting>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        UPDATE calculation_settings SET
            name = COALESCE($1, name),
            kind = COALESCE($2, kind),
            value_type = COALESCE($3, value_type),
            value = COALESCE($4, value),
            is_default = COALESCE($5, is_default),
            updated_at = $6
        WHERE id = $7 AND deleted_at IS NULL
        RETURNING id, name, kind, value_type, value, is_default, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.kind)
    .bind(data.value_type)
    .bind(data.value)
    .bind(data.is_default)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn soft_delete_calculation_setting(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE calculation_settings SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
