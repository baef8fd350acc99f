//! Inventory request route handlers.
//!
//! Requests identify their employee and item by human-typed strings, so
//! submission starts with a case-insensitive exact-match resolution step.
//! Cross-request rules for an (employee, item) pair: one pending request at
//! a time, and any past rejection blocks the pair for good.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use persistence::entities::{RequestStatusDb, RequestTypeDb};
use persistence::repositories::{EmployeeRepository, InventoryRepository, InventoryRequestRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthEmployee;

use domain::models::inventory_request::{
    reason_options, FormEmployeeOption, FormInventoryOption, RequestEmployeeBrief,
    RequestFormData, RequestInventoryBrief, RequestItem, SubmitRequestRequest,
    UpdateRequestStatusRequest,
};
use domain::models::{RequestStatus, RequestType, Transition};

/// Response wrapper for request mutations.
#[derive(Debug, Serialize)]
pub struct RequestActionResponse {
    pub message: String,
    pub request: RequestItem,
}

/// Response for request deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Serve the option sets backing the request submission form.
///
/// GET /api/v1/requests/form-data
pub async fn get_form_data(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());

    let employees = employee_repo
        .list_name_desk_pairs()
        .await?
        .into_iter()
        .map(|(name, desk_number)| FormEmployeeOption { name, desk_number })
        .collect();

    let inventory = inventory_repo
        .list_names()
        .await?
        .into_iter()
        .map(|name| FormInventoryOption { name })
        .collect();

    let response = RequestFormData {
        employees,
        inventory,
        request_types: vec![RequestType::New, RequestType::Exchange],
        reason_options: reason_options(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Submit a new inventory request.
///
/// POST /api/v1/requests
pub async fn submit_request(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Json(request): Json<SubmitRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let request_type: RequestType = request
        .request_type
        .parse()
        .map_err(|_| ApiError::Validation("requestType must be 'new' or 'exchange'".to_string()))?;

    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());
    let request_repo = InventoryRequestRepository::new(state.pool.clone());

    let employee = employee_repo
        .find_by_name_and_desk(&request.employee_name, &request.desk_number)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Employee not found for the provided name and deskNumber".to_string())
        })?;

    let item = inventory_repo
        .find_by_name(&request.inventory_name)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Inventory not found for the provided inventoryName".to_string())
        })?;

    // A past rejection blocks the pair permanently.
    if request_repo
        .exists_with_status(employee.id, item.id, RequestStatusDb::Rejected)
        .await?
    {
        return Err(ApiError::Conflict(format!(
            "Your previous request for \"{}\" was rejected. You cannot request this item again.",
            item.name
        )));
    }

    // Only one pending request per pair.
    if request_repo
        .exists_with_status(employee.id, item.id, RequestStatusDb::Pending)
        .await?
    {
        return Err(ApiError::Conflict(format!(
            "A pending request for \"{}\" by {} already exists.",
            item.name, employee.name
        )));
    }

    // Two concurrent submissions can both pass the check above; the
    // approval cascade auto-rejects the sibling pending later.
    let entity = request_repo
        .create(
            employee.id,
            item.id,
            RequestTypeDb::from(request_type),
            request.reason.trim(),
        )
        .await?;

    info!(
        request_id = %entity.id,
        employee_id = %employee.id,
        inventory_id = %item.id,
        request_type = %request_type,
        submitted_by = %auth.employee_id,
        "Inventory request submitted"
    );

    let response = RequestActionResponse {
        message: "Request submitted successfully".to_string(),
        request: RequestItem {
            id: entity.id,
            employee: RequestEmployeeBrief {
                id: employee.id,
                name: employee.name,
                desk_number: employee.desk_number,
            },
            inventory: RequestInventoryBrief {
                id: item.id,
                name: item.name,
            },
            request_type,
            reason: entity.reason,
            status: RequestStatus::from(entity.status),
            created_at: entity.created_at,
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// List all requests, newest first, with names resolved.
///
/// GET /api/v1/requests
pub async fn list_requests(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let request_repo = InventoryRequestRepository::new(state.pool.clone());

    let requests: Vec<RequestItem> = request_repo
        .list_with_names()
        .await?
        .into_iter()
        .map(|e| RequestItem {
            id: e.id,
            employee: RequestEmployeeBrief {
                id: e.employee_id,
                name: e.employee_name,
                desk_number: e.desk_number,
            },
            inventory: RequestInventoryBrief {
                id: e.inventory_id,
                name: e.inventory_name,
            },
            request_type: RequestType::from(e.request_type),
            reason: e.reason,
            status: RequestStatus::from(e.status),
            created_at: e.created_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(requests)))
}

/// Approve or reject a pending request.
///
/// PUT /api/v1/requests/{id}/status
///
/// Approving a "new" request reserves one unit of stock and assigns it to
/// the employee; rejection only changes the status. Re-submitting the
/// status a request already has succeeds without side effects.
pub async fn update_request_status(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(request_id): Path<Uuid>,
    Json(body): Json<UpdateRequestStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target: RequestStatus = body
        .status
        .parse()
        .ok()
        .filter(|s| *s != RequestStatus::Pending)
        .ok_or_else(|| {
            ApiError::Validation("status must be 'approved' or 'rejected'".to_string())
        })?;

    let request_repo = InventoryRequestRepository::new(state.pool.clone());

    let existing = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let current = RequestStatus::from(existing.status);
    let entity = match current.transition(target) {
        Ok(Transition::AlreadyFinal) => {
            let response = build_action_response(
                &state,
                existing,
                format!("Request already {}", target),
            )
            .await?;
            return Ok((StatusCode::OK, Json(response)));
        }
        Ok(Transition::Apply) => match target {
            RequestStatus::Approved => request_repo.approve(request_id).await?,
            RequestStatus::Rejected => request_repo.reject(request_id).await?,
            RequestStatus::Pending => unreachable!("pending filtered above"),
        },
        Err(e) => return Err(ApiError::Conflict(e.to_string())),
    };

    info!(
        request_id = %request_id,
        status = %target,
        decided_by = %auth.employee_id,
        "Request status updated"
    );

    let response = build_action_response(&state, entity, format!("Request {}", target)).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Remove a request record. Pure removal at any status, no stock effects.
///
/// DELETE /api/v1/requests/{id}
pub async fn delete_request(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request_repo = InventoryRequestRepository::new(state.pool.clone());

    let deleted = request_repo.delete(request_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Request not found".to_string()));
    }

    info!(
        request_id = %request_id,
        deleted_by = %auth.employee_id,
        "Request deleted"
    );

    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Request deleted successfully".to_string(),
        }),
    ))
}

/// Resolve employee/item names for a request entity and wrap it for the
/// response body.
async fn build_action_response(
    state: &AppState,
    entity: persistence::entities::InventoryRequestEntity,
    message: String,
) -> Result<RequestActionResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());

    let employee = employee_repo
        .find_by_id(entity.employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let item = inventory_repo
        .find_by_id(entity.inventory_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inventory item not found".to_string()))?;

    Ok(RequestActionResponse {
        message,
        request: RequestItem {
            id: entity.id,
            employee: RequestEmployeeBrief {
                id: employee.id,
                name: employee.name,
                desk_number: employee.desk_number,
            },
            inventory: RequestInventoryBrief {
                id: item.id,
                name: item.name,
            },
            request_type: RequestType::from(entity.request_type),
            reason: entity.reason,
            status: RequestStatus::from(entity.status),
            created_at: entity.created_at,
        },
    })
}
