//! Employee route handlers, including the assigned-inventory subresource.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use persistence::entities::{EmployeeEntity, EmployeeRoleDb};
use persistence::repositories::employee::NewEmployee;
use persistence::repositories::{
    AssignmentError, AssignmentRepository, EmployeeRepository, InventoryRepository, StockError,
};
use serde::{Deserialize, Serialize};
use shared::pagination::{PageInfo, PageParams};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthEmployee;

use domain::models::employee::{
    AssignInventoryRequest, AssignedEntry, AssignedItemDetail, CreateEmployeeRequest,
    EmployeeResponse, ListEmployeesResponse, UpdateEmployeeRequest,
};
use domain::models::EmployeeRole;

/// Query parameters for the employee listing.
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Response wrapper for employee mutations.
#[derive(Debug, Serialize)]
pub struct EmployeeActionResponse {
    pub message: String,
    pub employee: EmployeeResponse,
}

/// Response for employee deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Response wrapper for assignment mutations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentActionResponse {
    pub message: String,
    pub assigned_inventory: Vec<AssignedEntry>,
}

async fn employee_response(
    assignment_repo: &AssignmentRepository,
    entity: EmployeeEntity,
) -> Result<EmployeeResponse, ApiError> {
    let assigned_inventory = assignment_repo
        .entries(entity.id)
        .await?
        .into_iter()
        .map(|a| AssignedEntry {
            inventory_id: a.inventory_id,
            quantity: a.quantity,
        })
        .collect();

    Ok(EmployeeResponse {
        id: entity.id,
        name: entity.name,
        department: entity.department,
        desk_number: entity.desk_number,
        email: entity.email,
        phone: entity.phone,
        age: entity.age,
        gender: entity.gender,
        role: EmployeeRole::from(entity.role),
        assigned_inventory,
        created_at: entity.created_at,
    })
}

/// List employees with pagination and optional name search.
///
/// GET /api/v1/employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    let params = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .normalized();
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let total = employee_repo.count(search).await?;
    let entities = employee_repo
        .list(search, params.limit(), params.offset())
        .await?;

    let mut employees = Vec::with_capacity(entities.len());
    for entity in entities {
        employees.push(employee_response(&assignment_repo, entity).await?);
    }

    let page_info = PageInfo::new(params, total);
    let response = ListEmployeesResponse {
        employees,
        total_employees: total,
        total_pages: page_info.total_pages,
        current_page: page_info.current_page,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Create an employee, reserving stock for any initial assignments and
/// sending the welcome email off the critical path.
///
/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    if employee_repo.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    // Resolve names to items up front so failures name the offending item.
    let mut initial_assignments = Vec::with_capacity(request.assigned_inventory.len());
    for assignment in &request.assigned_inventory {
        let item = inventory_repo
            .find_by_name(&assignment.inventory_name)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Inventory not found: {}", assignment.inventory_name))
            })?;

        if item.available_qty < assignment.quantity {
            return Err(ApiError::InsufficientStock(format!(
                "Not enough quantity available for: {}",
                item.name
            )));
        }

        initial_assignments.push((item.id, assignment.quantity));
    }

    let password_hash = shared::password::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let role = request.role.unwrap_or_default();
    let entity = employee_repo
        .create(
            NewEmployee {
                name: request.name.trim(),
                department: request.department.trim(),
                desk_number: request.desk_number.trim(),
                email: request.email.trim(),
                phone: request.phone.as_deref(),
                age: request.age,
                gender: request.gender.as_deref(),
                role: EmployeeRoleDb::from(role),
                password_hash: &password_hash,
            },
            &initial_assignments,
        )
        .await?;

    info!(
        employee_id = %entity.id,
        role = %role,
        created_by = %auth.employee_id,
        initial_assignments = initial_assignments.len(),
        "Employee created"
    );

    // Fire-and-forget welcome email; failure is logged, never surfaced.
    let email_service = state.email.clone();
    let to_email = entity.email.clone();
    let to_name = entity.name.clone();
    let password = request.password.clone();
    tokio::spawn(async move {
        if let Err(e) = email_service
            .send_welcome_email(&to_email, &to_name, &password)
            .await
        {
            error!(to = %to_email, error = %e, "Failed to send welcome email");
        }
    });

    let response = EmployeeActionResponse {
        message: "Employee added successfully. Password sent via email if email delivery succeeded."
            .to_string(),
        employee: employee_response(&assignment_repo, entity).await?,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Update an employee's profile and reconcile assignment quantities.
///
/// PUT /api/v1/employees/{id}
///
/// Assignment entries set the target quantity for the named item; the
/// difference against the current assignment is reserved from or released
/// to stock. Unknown item names are skipped.
pub async fn update_employee(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(employee_id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    let entity = employee_repo
        .update_profile(
            employee_id,
            request.name.as_deref(),
            request.department.as_deref(),
            request.desk_number.as_deref(),
            request.email.as_deref(),
            request.phone.as_deref(),
            request.age,
            request.gender.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    if let Some(assignments) = &request.assigned_inventory {
        for assignment in assignments {
            let Some(item) = inventory_repo
                .find_by_name(&assignment.inventory_name)
                .await?
            else {
                continue;
            };

            assignment_repo
                .set_quantity(employee_id, item.id, assignment.quantity)
                .await
                .map_err(|e| match e {
                    AssignmentError::Stock(StockError::Insufficient) => {
                        ApiError::InsufficientStock(format!(
                            "Not enough inventory for {}",
                            item.name
                        ))
                    }
                    other => ApiError::from(other),
                })?;
        }
    }

    info!(
        employee_id = %employee_id,
        updated_by = %auth.employee_id,
        "Employee updated"
    );

    let response = EmployeeActionResponse {
        message: "Employee updated successfully".to_string(),
        employee: employee_response(&assignment_repo, entity).await?,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Delete an employee, returning every assigned quantity to stock first.
///
/// DELETE /api/v1/employees/{id}
pub async fn delete_employee(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());

    let deleted = employee_repo.delete_restoring_stock(employee_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    info!(
        employee_id = %employee_id,
        deleted_by = %auth.employee_id,
        "Employee deleted, inventory restored"
    );

    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Employee deleted and inventory restored".to_string(),
        }),
    ))
}

/// List an employee's assigned inventory with item details.
///
/// GET /api/v1/employees/{id}/assigned-inventory
pub async fn get_assigned_inventory(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    if employee_repo.find_by_id(employee_id).await?.is_none() {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    let items: Vec<AssignedItemDetail> = assignment_repo
        .entries_with_items(employee_id)
        .await?
        .into_iter()
        .map(|e| AssignedItemDetail {
            inventory_id: e.inventory_id,
            name: e.item_name,
            image: e.image_url,
            quantity: e.quantity,
            description: e.description,
        })
        .collect();

    Ok((StatusCode::OK, Json(items)))
}

/// Assign inventory to an employee, reserving stock for the quantity.
///
/// POST /api/v1/employees/{id}/assigned-inventory
pub async fn assign_inventory(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(employee_id): Path<Uuid>,
    Json(request): Json<AssignInventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let inventory_repo = InventoryRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    if employee_repo.find_by_id(employee_id).await?.is_none() {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    let item = inventory_repo
        .find_by_id(request.inventory_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inventory item not found".to_string()))?;

    assignment_repo
        .assign(employee_id, item.id, request.quantity)
        .await
        .map_err(|e| match e {
            AssignmentError::Stock(StockError::Insufficient) => ApiError::InsufficientStock(
                format!("Not enough quantity available for {}", item.name),
            ),
            other => ApiError::from(other),
        })?;

    info!(
        employee_id = %employee_id,
        inventory_id = %item.id,
        quantity = request.quantity,
        assigned_by = %auth.employee_id,
        "Inventory assigned"
    );

    let assigned_inventory = assignment_repo
        .entries(employee_id)
        .await?
        .into_iter()
        .map(|a| AssignedEntry {
            inventory_id: a.inventory_id,
            quantity: a.quantity,
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(AssignmentActionResponse {
            message: "Inventory assigned successfully".to_string(),
            assigned_inventory,
        }),
    ))
}

/// Query parameter for assignment removal.
#[derive(Debug, Deserialize)]
pub struct RemoveAssignedQuery {
    #[serde(default)]
    pub all: bool,
}

/// Reduce an employee's assignment by one unit, or remove it entirely with
/// `?all=true`. The returned units go back to the item's available stock.
///
/// DELETE /api/v1/employees/{id}/assigned-inventory/{inventory_id}
pub async fn remove_assigned_inventory(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path((employee_id, inventory_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<RemoveAssignedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_repo = EmployeeRepository::new(state.pool.clone());
    let assignment_repo = AssignmentRepository::new(state.pool.clone());

    if employee_repo.find_by_id(employee_id).await?.is_none() {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    assignment_repo
        .reduce(employee_id, inventory_id, query.all)
        .await?;

    info!(
        employee_id = %employee_id,
        inventory_id = %inventory_id,
        all = query.all,
        removed_by = %auth.employee_id,
        "Assigned inventory reduced"
    );

    let assigned_inventory = assignment_repo
        .entries(employee_id)
        .await?
        .into_iter()
        .map(|a| AssignedEntry {
            inventory_id: a.inventory_id,
            quantity: a.quantity,
        })
        .collect();

    let message = if query.all {
        "Removed all quantities"
    } else {
        "Inventory quantity reduced by 1"
    };

    Ok((
        StatusCode::OK,
        Json(AssignmentActionResponse {
            message: message.to_string(),
            assigned_inventory,
        }),
    ))
}
