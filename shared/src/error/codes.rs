//! Unified error codes for the back-office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Discount errors
//! - 6xxx: Catalog errors (products, categories)
//! - 7xxx: Customer errors
//! - 8xxx: Settings and homepage section errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire so the admin frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Password too short
    PasswordTooShort = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Owner role required
    OwnerRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order status transition is not allowed
    OrderInvalidTransition = 4002,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order item quantity is invalid
    OrderInvalidQuantity = 4005,
    /// Order is empty
    OrderEmpty = 4007,

    // ==================== 5xxx: Discount ====================
    /// Discount not found
    DiscountNotFound = 5001,
    /// Discount code already exists
    DiscountCodeExists = 5002,
    /// Discount is not active
    DiscountInactive = 5003,
    /// Discount has expired
    DiscountExpired = 5004,
    /// Discount validity window has not started
    DiscountNotStarted = 5005,
    /// Discount usage limit reached
    DiscountUsageExceeded = 5006,
    /// Order subtotal below the discount minimum
    DiscountMinAmountNotMet = 5007,
    /// Discount value is invalid for its kind
    DiscountInvalidValue = 5008,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Product is hidden and cannot be sold
    ProductUnavailable = 6004,
    /// Product SKU already exists
    ProductSkuExists = 6005,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has products
    CategoryHasProducts = 6102,
    /// Category slug already exists
    CategorySlugExists = 6103,

    // ==================== 7xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 7001,
    /// Customer email already exists
    CustomerEmailExists = 7002,

    // ==================== 8xxx: Settings ====================
    /// Calculation setting not found
    CalculationSettingNotFound = 8001,
    /// Product cost setting not found
    ProductCostSettingNotFound = 8101,
    /// Homepage section not found
    SectionNotFound = 8201,
    /// Homepage section payload is invalid
    SectionInvalidPayload = 8202,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Export generation failed
    ExportFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this represents a successful operation
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OwnerRequired => "Owner role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderInvalidQuantity => "Order item quantity must be at least 1",
            ErrorCode::OrderEmpty => "Order is empty",

            // Discount
            ErrorCode::DiscountNotFound => "Discount not found",
            ErrorCode::DiscountCodeExists => "Discount code already exists",
            ErrorCode::DiscountInactive => "Discount is not active",
            ErrorCode::DiscountExpired => "Discount has expired",
            ErrorCode::DiscountNotStarted => "Discount is not yet valid",
            ErrorCode::DiscountUsageExceeded => "Discount usage limit reached",
            ErrorCode::DiscountMinAmountNotMet => "Order subtotal is below the discount minimum",
            ErrorCode::DiscountInvalidValue => "Discount value is invalid",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ProductUnavailable => "Product is not available for sale",
            ErrorCode::ProductSkuExists => "Product SKU already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CategorySlugExists => "Category slug already exists",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerEmailExists => "Customer email already exists",

            // Settings
            ErrorCode::CalculationSettingNotFound => "Calculation setting not found",
            ErrorCode::ProductCostSettingNotFound => "Product cost setting not found",
            ErrorCode::SectionNotFound => "Homepage section not found",
            ErrorCode::SectionInvalidPayload => "Homepage section payload must be a JSON object",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ExportFailed => "Export generation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::OwnerRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderInvalidQuantity),
            4007 => Ok(ErrorCode::OrderEmpty),

            // Discount
            5001 => Ok(ErrorCode::DiscountNotFound),
            5002 => Ok(ErrorCode::DiscountCodeExists),
            5003 => Ok(ErrorCode::DiscountInactive),
            5004 => Ok(ErrorCode::DiscountExpired),
            5005 => Ok(ErrorCode::DiscountNotStarted),
            5006 => Ok(ErrorCode::DiscountUsageExceeded),
            5007 => Ok(ErrorCode::DiscountMinAmountNotMet),
            5008 => Ok(ErrorCode::DiscountInvalidValue),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ProductUnavailable),
            6005 => Ok(ErrorCode::ProductSkuExists),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasProducts),
            6103 => Ok(ErrorCode::CategorySlugExists),

            // Customer
            7001 => Ok(ErrorCode::CustomerNotFound),
            7002 => Ok(ErrorCode::CustomerEmailExists),

            // Settings
            8001 => Ok(ErrorCode::CalculationSettingNotFound),
            8101 => Ok(ErrorCode::ProductCostSettingNotFound),
            8201 => Ok(ErrorCode::SectionNotFound),
            8202 => Ok(ErrorCode::SectionInvalidPayload),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9101 => Ok(ErrorCode::ExportFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::DiscountExpired.code(), 5004);
        assert_eq!(ErrorCode::CategoryHasProducts.code(), 6102);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 7001);
        assert_eq!(ErrorCode::SectionNotFound.code(), 8201);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::TooManyRequests,
            ErrorCode::PasswordTooShort,
            ErrorCode::OwnerRequired,
            ErrorCode::OrderInvalidTransition,
            ErrorCode::DiscountMinAmountNotMet,
            ErrorCode::ProductSkuExists,
            ErrorCode::CustomerEmailExists,
            ErrorCode::SectionInvalidPayload,
            ErrorCode::ExportFailed,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::OrderNotFound).unwrap(),
            "4001"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("5006").unwrap();
        assert_eq!(code, ErrorCode::DiscountUsageExceeded);

        let code: ErrorCode = serde_json::from_str("9001").unwrap();
        assert_eq!(code, ErrorCode::InternalError);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::DiscountExpired.message(), "Discount has expired");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
