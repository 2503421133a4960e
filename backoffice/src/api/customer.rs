//! Customer endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerCreate, CustomerDetail, CustomerUpdate};
use shared::request::PaginationQuery;
use shared::response::PaginatedResponse;

use crate::db;
use crate::state::AppState;
use crate::util::normalize_email;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank,
    validate_optional_email, validate_optional_text, validate_required_text,
};

use super::{ApiResult, conflict};

const EMAIL_CONSTRAINT: &str = "customers_email_key";

fn validate_contact(
    email: &Option<String>,
    phone: &Option<String>,
    address: &Option<String>,
    note: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_email(email)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/admin/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<Customer>> {
    let page = query.page();
    let search = query.search_pattern();
    let (rows, total) = db::customer::list_customers(&state.pool, search.as_deref(), page).await?;
    Ok(Json(PaginatedResponse::from_page(rows, total, page)))
}

/// GET /api/admin/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerDetail> {
    let detail = db::customer::get_customer_detail(&state.pool, id)
        .await?
        .ok_or(ErrorCode::CustomerNotFound)?;
    Ok(Json(detail))
}

/// POST /api/admin/customers
pub async fn create_customer(
    State(state): State<AppState>,
    Json(data): Json<CustomerCreate>,
) -> ApiResult<Customer> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_contact(&data.email, &data.phone, &data.address, &data.note)?;

    let data = CustomerCreate {
        name: data.name.trim().to_string(),
        email: non_blank(data.email).map(|e| normalize_email(&e)),
        phone: non_blank(data.phone),
        address: non_blank(data.address),
        note: non_blank(data.note),
    };

    let customer = db::customer::create_customer(&state.pool, &data)
        .await
        .map_err(conflict(EMAIL_CONSTRAINT, ErrorCode::CustomerEmailExists))?;

    tracing::info!(customer_id = customer.id, "Customer created");
    Ok(Json(customer))
}

/// PUT /api/admin/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<CustomerUpdate>,
) -> ApiResult<Customer> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_contact(&data.email, &data.phone, &data.address, &data.note)?;

    let data = CustomerUpdate {
        name: data.name.map(|n| n.trim().to_string()),
        email: non_blank(data.email).map(|e| normalize_email(&e)),
        phone: non_blank(data.phone),
        address: non_blank(data.address),
        note: non_blank(data.note),
    };

    let customer = db::customer::update_customer(&state.pool, id, &data)
        .await
        .map_err(conflict(EMAIL_CONSTRAINT, ErrorCode::CustomerEmailExists))?
        .ok_or(ErrorCode::CustomerNotFound)?;
    Ok(Json(customer))
}

/// DELETE /api/admin/customers/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::customer::soft_delete_customer(&state.pool, id).await? {
        return Err(ErrorCode::CustomerNotFound.into());
    }
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(Json(true))
}
