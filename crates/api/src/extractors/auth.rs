//! Authenticated employee extractor.
//!
//! Handlers take this extractor to access the employee behind the Bearer
//! token. When the auth middleware already ran, the extension is reused;
//! otherwise the token is validated directly.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthEmployee as AuthEmployeeData;

/// Authenticated employee information from the session token.
#[derive(Debug, Clone)]
pub struct AuthEmployee(pub AuthEmployeeData);

#[async_trait]
impl FromRequestParts<AppState> for AuthEmployee {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AuthEmployeeData>() {
            return Ok(AuthEmployee(auth.clone()));
        }

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let auth = AuthEmployeeData::from_token(&state.jwt, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthEmployee(auth))
    }
}
