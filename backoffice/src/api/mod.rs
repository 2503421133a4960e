//! HTTP API routes for the back-office
//!
//! - `/health` and `/api/auth/login` are public
//! - `/api/storefront/*` serves the public shop (no cost fields)
//! - `/api/admin/*` requires an admin JWT

pub mod auth;
pub mod category;
pub mod customer;
pub mod discount;
pub mod health;
pub mod invoice;
pub mod order;
pub mod product;
pub mod report;
pub mod section;
pub mod settings;
pub mod storefront;

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use http::{HeaderValue, Method, header};
use shared::error::ErrorCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth_middleware;
use crate::auth::rate_limit::login_rate_limit;
use crate::error::{BoxError, ServiceError, is_unique_violation};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Map a unique violation on `constraint` to `code`; other errors stay database errors
pub(crate) fn conflict(
    constraint: &'static str,
    code: ErrorCode,
) -> impl FnOnce(BoxError) -> ServiceError {
    move |e| {
        if is_unique_violation(&e, constraint) {
            code.into()
        } else {
            ServiceError::Db(e)
        }
    }
}

/// Create the combined router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    let storefront = Router::new()
        .route("/api/storefront/homepage", get(storefront::homepage))
        .route("/api/storefront/categories", get(storefront::list_categories))
        .route("/api/storefront/products", get(storefront::list_products));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(login)
        .merge(storefront)
        .merge(admin_router(state.clone()))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/me", get(auth::me))
        // Catalog
        .route(
            "/api/admin/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route(
            "/api/admin/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route(
            "/api/admin/products/{id}/suggested-price",
            get(product::suggested_price),
        )
        // Customers
        .route(
            "/api/admin/customers",
            get(customer::list_customers).post(customer::create_customer),
        )
        .route(
            "/api/admin/customers/{id}",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer),
        )
        // Discounts
        .route(
            "/api/admin/discounts",
            get(discount::list_discounts).post(discount::create_discount),
        )
        .route("/api/admin/discounts/validate", get(discount::validate_code))
        .route(
            "/api/admin/discounts/{id}",
            get(discount::get_discount)
                .put(discount::update_discount)
                .delete(discount::delete_discount),
        )
        // Settings
        .route(
            "/api/admin/calculation-settings",
            get(settings::list_calculation_settings).post(settings::create_calculation_setting),
        )
        .route(
            "/api/admin/calculation-settings/{id}",
            get(settings::get_calculation_setting)
                .put(settings::update_calculation_setting)
                .delete(settings::delete_calculation_setting),
        )
        .route(
            "/api/admin/product-cost-settings",
            get(settings::list_product_cost_settings).post(settings::create_product_cost_setting),
        )
        .route(
            "/api/admin/product-cost-settings/{id}",
            get(settings::get_product_cost_setting)
                .put(settings::update_product_cost_setting)
                .delete(settings::delete_product_cost_setting),
        )
        // Orders
        .route(
            "/api/admin/orders",
            get(order::list_orders).post(order::create_order),
        )
        .route("/api/admin/orders/preview", post(order::preview_order))
        .route(
            "/api/admin/orders/{id}",
            get(order::get_order)
                .put(order::update_order)
                .delete(order::delete_order),
        )
        .route("/api/admin/orders/{id}/invoice", get(invoice::get_invoice))
        .route("/api/admin/invoices/export", get(invoice::export_invoices))
        // Homepage sections
        .route("/api/admin/sections", get(section::list_sections))
        .route(
            "/api/admin/sections/{tab}",
            get(section::get_section)
                .put(section::update_section)
                .delete(section::reset_section),
        )
        // Reports
        .route("/api/admin/reports/summary", get(report::summary))
        .route("/api/admin/reports/daily", get(report::daily))
        .route("/api/admin/reports/top-products", get(report::top_products))
        .route("/api/admin/reports/top-customers", get(report::top_customers))
        .route(
            "/api/admin/reports/status-breakdown",
            get(report::status_breakdown),
        )
        .route(
            "/api/admin/reports/operating-costs",
            get(report::operating_costs),
        )
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}
