//! Authentication route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use persistence::repositories::EmployeeRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

use domain::models::employee::{LoginEmployeeBrief, LoginRequest, LoginResponse};

/// Sign in with email and password.
///
/// POST /api/v1/auth/login
///
/// The response token carries the employee id, role and email; the
/// dashboard sends it as a Bearer token on every call.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let employee_repo = EmployeeRepository::new(state.pool.clone());

    // The same vague message for unknown email and wrong password.
    let employee = employee_repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let matches = shared::password::verify_password(&request.password, &employee.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !matches {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let role = domain::models::EmployeeRole::from(employee.role);
    let token = state
        .jwt
        .generate_token(employee.id, &role.to_string(), &employee.email)
        .map_err(|e| ApiError::Internal(format!("Failed to issue token: {}", e)))?;

    info!(
        employee_id = %employee.id,
        role = %role,
        "Employee logged in"
    );

    let response = LoginResponse {
        message: "Login successful".to_string(),
        token,
        employee: LoginEmployeeBrief {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            role,
            desk_number: employee.desk_number,
        },
    };

    Ok((StatusCode::OK, Json(response)))
}
