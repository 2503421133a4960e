//! Error type and its JSON body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error: code, message and optional structured details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Context for the client (`field`, offending ids, limits)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message of `code`
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Input error tied to one request field (`details.field`)
    pub fn field_error(code: ErrorCode, field: &str, message: impl Into<String>) -> Self {
        Self::with_message(code, message).with_detail("field", field)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

/// Result with [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of an error response: `{code, message, details?}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: u16,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a HashMap<String, Value>>,
}

impl<'a> From<&'a AppError> for ErrorBody<'a> {
    fn from(err: &'a AppError) -> Self {
        Self {
            code: err.code.code(),
            message: &err.message,
            details: err.details.as_ref(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }

        let status = self.http_status();
        (status, axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::CustomerNotFound);
        assert_eq!(err.message, "Customer not found");
        assert!(err.details.is_none());
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_field_error_carries_field() {
        let err = AppError::field_error(ErrorCode::RequiredField, "price", "price is required")
            .with_detail("product_id", 9);
        let details = err.details.unwrap();
        assert_eq!(details["field"], "price");
        assert_eq!(details["product_id"], 9);
    }

    #[test]
    fn test_display_is_message() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
        assert_eq!(err.to_string(), "Order 42 not found");
    }

    #[test]
    fn test_error_body_json() {
        let err = AppError::new(ErrorCode::OwnerRequired);
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], ErrorCode::OwnerRequired.code());
        assert!(json.get("details").is_none());

        let err = AppError::validation("bad").with_detail("field", "email");
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["message"], "bad");
        assert_eq!(json["details"]["field"], "email");
    }
}
