//! Admin JWT authentication for the management API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::AdminRole;

use crate::state::AppState;

/// JWT claims for admin authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin ID
    pub sub: String,
    /// Admin email
    pub email: String,
    /// Admin role
    pub role: AdminRole,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin identity extracted from JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub email: String,
    pub role: AdminRole,
}

impl AdminIdentity {
    /// Owner-only guard
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.role == AdminRole::Owner {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::OwnerRequired))
        }
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for an admin
pub fn create_token(
    admin_id: i64,
    email: &str,
    role: AdminRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AdminClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a token, returning the identity it carries
pub fn verify_token(token: &str, secret: &str) -> Result<AdminIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let admin_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;

    Ok(AdminIdentity {
        admin_id,
        email: token_data.claims.email,
        role: token_data.claims.role,
    })
}

/// Middleware that extracts and verifies admin JWT from Authorization header
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
                .into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::invalid_token("Invalid Authorization format").into_response()
    })?;

    let identity = verify_token(token, &state.jwt_secret).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = create_token(42, "owner@shop.example", AdminRole::Owner, SECRET).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert_eq!(identity.admin_id, 42);
        assert_eq!(identity.email, "owner@shop.example");
        assert_eq!(identity.role, AdminRole::Owner);
        assert!(identity.require_owner().is_ok());
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = create_token(1, "a@b.c", AdminRole::Staff, SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token_is_reported() {
        let past = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let claims = AdminClaims {
            sub: "1".into(),
            email: "a@b.c".into(),
            role: AdminRole::Staff,
            exp: past,
            iat: past - 60,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_staff_is_not_owner() {
        let identity = AdminIdentity {
            admin_id: 2,
            email: "staff@shop.example".into(),
            role: AdminRole::Staff,
        };
        assert_eq!(
            identity.require_owner().unwrap_err().code,
            ErrorCode::OwnerRequired
        );
    }
}
