//! Admin authentication and request throttling

pub mod admin_auth;
pub mod rate_limit;

pub use admin_auth::{AdminIdentity, admin_auth_middleware, create_token};
