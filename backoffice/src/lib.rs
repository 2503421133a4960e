//! Back-office service for a small shop
//!
//! - Admin API: catalog, customers, discounts, orders, pricing settings,
//!   homepage sections, reports and invoice export (JWT authenticated)
//! - Storefront API: public read-only catalog and homepage
//!
//! Backed by PostgreSQL; every business table is soft-deleted.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod invoice;
pub mod pricing;
pub mod reports;
pub mod sections;
pub mod services;
pub mod state;
pub mod util;
pub mod validation;

use shared::models::AdminRole;
use sqlx::PgPool;

use config::Config;
use error::BoxError;

/// Create the owner account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`
/// when the admins table is still empty.
pub async fn bootstrap_admin(pool: &PgPool, config: &Config) -> Result<(), BoxError> {
    if db::admins::count(pool).await? > 0 {
        return Ok(());
    }

    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        tracing::warn!("No admin account exists; set ADMIN_EMAIL and ADMIN_PASSWORD to create one");
        return Ok(());
    };

    let email = util::normalize_email(email);
    let hashed = util::hash_password(password).map_err(|e| format!("hash password: {e}"))?;
    db::admins::create(
        pool,
        util::snowflake_id(),
        &email,
        &hashed,
        "Owner",
        AdminRole::Owner,
        util::now_millis(),
    )
    .await?;

    tracing::info!(email = %email, "Bootstrap owner account created");
    Ok(())
}
