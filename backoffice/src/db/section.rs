//! Homepage section storage

use serde_json::Value;
use shared::models::SectionRecord;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_sections(pool: &PgPool) -> Result<Vec<SectionRecord>, BoxError> {
    let rows = sqlx::query_as(
        "SELECT section_id, payload, is_visible, sort_order, updated_at FROM homepage_sections",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_section(pool: &PgPool, section_id: &str) -> Result<Option<SectionRecord>, BoxError> {
    let row = sqlx::query_as(
        "SELECT section_id, payload, is_visible, sort_order, updated_at FROM homepage_sections WHERE section_id = $1",
    )
    .bind(section_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert or replace the stored settings for a tab.
///
/// `is_visible`/`sort_order` left as `None` keep the stored value.
pub async fn upsert_section(
    pool: &PgPool,
    section_id: &str,
    payload: &Value,
    is_visible: Option<bool>,
    sort_order: Option<i32>,
) -> Result<SectionRecord, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as(
        r#"
        INSERT INTO homepage_sections (section_id, payload, is_visible, sort_order, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (section_id)
        DO UPDATE SET
            payload = EXCLUDED.payload,
            is_visible = COALESCE(EXCLUDED.is_visible, homepage_sections.is_visible),
            sort_order = COALESCE(EXCLUDED.sort_order, homepage_sections.sort_order),
            updated_at = EXCLUDED.updated_at
        RETURNING section_id, payload, is_visible, sort_order, updated_at
        "#,
    )
    .bind(section_id)
    .bind(payload)
    .bind(is_visible)
    .bind(sort_order)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Drop the stored settings so the tab falls back to its defaults
pub async fn delete_section(pool: &PgPool, section_id: &str) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM homepage_sections WHERE section_id = $1")
        .bind(section_id)
        .execute(pool)
        .await?;
    Ok(())
}
