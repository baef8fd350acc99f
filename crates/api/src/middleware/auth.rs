//! JWT authentication middleware.
//!
//! Validates the Bearer token and stores the authenticated employee in
//! request extensions. Role checks happen here, before the core handlers
//! run; handlers themselves trust the claims.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::EmployeeRole;
use shared::jwt::JwtConfig;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated employee information extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthEmployee {
    pub employee_id: Uuid,
    pub role: EmployeeRole,
    pub email: String,
}

impl AuthEmployee {
    /// Validates a session token and returns the authenticated employee.
    pub fn from_token(jwt: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let employee_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| "Invalid employee ID in token".to_string())?;

        let role = claims
            .role
            .parse::<EmployeeRole>()
            .map_err(|_| "Invalid role in token".to_string())?;

        Ok(AuthEmployee {
            employee_id,
            role,
            email: claims.email,
        })
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized(
                "Missing or invalid Authorization header".to_string(),
            )
            .into_response();
        }
    };

    match AuthEmployee::from_token(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
    }
}

/// Middleware that requires a valid session token with the admin role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized(
                "Missing or invalid Authorization header".to_string(),
            )
            .into_response();
        }
    };

    let auth = match AuthEmployee::from_token(&state.jwt, token) {
        Ok(auth) => auth,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return ApiError::Unauthorized("Invalid or expired token".to_string()).into_response();
        }
    };

    if auth.role != EmployeeRole::Admin {
        return ApiError::Forbidden("Admin access required".to_string()).into_response();
    }

    req.extensions_mut().insert(auth);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig::new("middleware-test-secret", 3600, 30)
    }

    #[test]
    fn test_from_token_valid() {
        let config = jwt();
        let id = Uuid::new_v4();
        let token = config.generate_token(id, "admin", "a@stocksync.app").unwrap();

        let auth = AuthEmployee::from_token(&config, &token).unwrap();
        assert_eq!(auth.employee_id, id);
        assert_eq!(auth.role, EmployeeRole::Admin);
        assert_eq!(auth.email, "a@stocksync.app");
    }

    #[test]
    fn test_from_token_bad_role() {
        let config = jwt();
        let token = config
            .generate_token(Uuid::new_v4(), "superuser", "a@stocksync.app")
            .unwrap();
        assert!(AuthEmployee::from_token(&config, &token).is_err());
    }

    #[test]
    fn test_from_token_garbage() {
        assert!(AuthEmployee::from_token(&jwt(), "garbage").is_err());
    }
}
