//! Homepage section endpoints (admin)

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{HomepageSection, SectionUpdate};

use crate::db;
use crate::sections::{find_default, merge_section, merge_sections, validate_payload};
use crate::state::AppState;

use super::ApiResult;

fn unknown_tab(tab: &str) -> AppError {
    AppError::new(ErrorCode::SectionNotFound).with_detail("section_id", tab)
}

/// GET /api/admin/sections
pub async fn list_sections(State(state): State<AppState>) -> ApiResult<Vec<HomepageSection>> {
    let records = db::section::list_sections(&state.pool).await?;
    Ok(Json(merge_sections(&records)))
}

/// GET /api/admin/sections/{tab}
pub async fn get_section(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> ApiResult<HomepageSection> {
    if find_default(&tab).is_none() {
        return Err(unknown_tab(&tab).into());
    }
    let record = db::section::get_section(&state.pool, &tab).await?;
    let section = merge_section(&tab, record.as_ref()).ok_or_else(|| unknown_tab(&tab))?;
    Ok(Json(section))
}

/// PUT /api/admin/sections/{tab}
///
/// Stores the payload as sent; defaults fill the gaps on read.
pub async fn update_section(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Json(data): Json<SectionUpdate>,
) -> ApiResult<HomepageSection> {
    if find_default(&tab).is_none() {
        return Err(unknown_tab(&tab).into());
    }
    validate_payload(&data.payload)?;

    let record = db::section::upsert_section(
        &state.pool,
        &tab,
        &data.payload,
        data.is_visible,
        data.sort_order,
    )
    .await?;
    tracing::info!(section_id = %tab, "Homepage section saved");

    let section = merge_section(&tab, Some(&record)).ok_or_else(|| unknown_tab(&tab))?;
    Ok(Json(section))
}

/// DELETE /api/admin/sections/{tab}
///
/// Drops the stored row; the tab falls back to its defaults.
pub async fn reset_section(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> ApiResult<HomepageSection> {
    let section = merge_section(&tab, None).ok_or_else(|| unknown_tab(&tab))?;
    db::section::delete_section(&state.pool, &tab).await?;
    tracing::info!(section_id = %tab, "Homepage section reset to defaults");
    Ok(Json(section))
}
