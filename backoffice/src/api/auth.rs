//! Admin login and profile endpoints

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Admin, LoginRequest, LoginResponse};

use crate::auth::{AdminIdentity, create_token};
use crate::db;
use crate::state::AppState;
use crate::util::{normalize_email, verify_password};

use super::ApiResult;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&req.email);
    let account = db::admins::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &account.hashed_password) {
        tracing::info!(email = %email, "Login rejected: wrong password");
        return Err(AppError::invalid_credentials().into());
    }

    if !account.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let token = create_token(account.id, &account.email, account.role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let now = shared::util::now_millis();
    db::admins::set_last_login(&state.pool, account.id, now).await?;

    let mut admin = Admin::from(account);
    admin.last_login_at = Some(now);
    tracing::info!(admin_id = admin.id, role = admin.role.as_str(), "Admin logged in");

    Ok(Json(LoginResponse { token, admin }))
}

/// GET /api/admin/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Admin> {
    let admin = db::admins::find_by_id(&state.pool, identity.admin_id)
        .await?
        .ok_or_else(AppError::not_authenticated)?;
    Ok(Json(admin))
}
