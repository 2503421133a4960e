//! Shared types for the back-office
//!
//! Common types used by the service and its clients: the unified error
//! system, domain models, pagination and time/id helpers.

pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use request::{Page, PaginationQuery};
pub use response::PaginatedResponse;
