//! Inventory item route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use persistence::entities::InventoryItemEntity;
use persistence::repositories::InventoryRepository;
use serde::{Deserialize, Serialize};
use shared::pagination::{PageInfo, PageParams};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthEmployee;

use domain::models::inventory_item::{
    CreateInventoryItemRequest, InventoryItemResponse, ListInventoryResponse,
    UpdateInventoryItemRequest,
};

/// Query parameters for the inventory listing.
#[derive(Debug, Deserialize)]
pub struct ListInventoryQuery {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

// The dashboard renders a 2x3 card grid.
fn default_limit() -> u32 {
    6
}

/// Response wrapper for item creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub message: String,
    pub new_item: InventoryItemResponse,
}

/// Response for item deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

fn item_response(entity: InventoryItemEntity) -> InventoryItemResponse {
    InventoryItemResponse {
        id: entity.id,
        name: entity.name,
        category: entity.category,
        description: entity.description,
        total_quantity: entity.total_quantity,
        available_qty: entity.available_qty,
        image_url: entity.image_url,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// List inventory items, newest first, paginated.
///
/// GET /api/v1/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ListInventoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let inventory_repo = InventoryRepository::new(state.pool.clone());

    let params = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .normalized();

    let total = inventory_repo.count().await?;
    let data = inventory_repo
        .list(params.limit(), params.offset())
        .await?
        .into_iter()
        .map(item_response)
        .collect();

    let page_info = PageInfo::new(params, total);
    let response = ListInventoryResponse {
        total_items: total,
        total_pages: page_info.total_pages,
        current_page: page_info.current_page,
        data,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Create an inventory item.
///
/// POST /api/v1/inventory
pub async fn create_inventory(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let inventory_repo = InventoryRepository::new(state.pool.clone());

    // A fresh item has its whole stock on the shelf unless told otherwise.
    let available_qty = request.available_qty.unwrap_or(request.total_quantity);

    let entity = inventory_repo
        .create(
            request.name.trim(),
            request.category.trim(),
            request.description.as_deref(),
            request.total_quantity,
            available_qty,
            request.image_url.as_deref(),
        )
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict(format!(
                    "An inventory item named \"{}\" already exists",
                    request.name.trim()
                ))
            }
            _ => ApiError::from(e),
        })?;

    info!(
        inventory_id = %entity.id,
        name = %entity.name,
        total_quantity = entity.total_quantity,
        created_by = %auth.employee_id,
        "Inventory item created"
    );

    let response = CreateItemResponse {
        message: "Inventory added successfully".to_string(),
        new_item: item_response(entity),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Edit an inventory item. Unset fields keep their value.
///
/// PUT /api/v1/inventory/{id}
pub async fn update_inventory(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(inventory_id): Path<Uuid>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let inventory_repo = InventoryRepository::new(state.pool.clone());

    // The stock-bounds constraint rejects edits that would leave
    // available_qty above total_quantity.
    let entity = inventory_repo
        .update(
            inventory_id,
            request.name.as_deref(),
            request.category.as_deref(),
            request.description.as_deref(),
            request.total_quantity,
            request.available_qty,
            request.image_url.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Inventory not found".to_string()))?;

    info!(
        inventory_id = %inventory_id,
        updated_by = %auth.employee_id,
        "Inventory item updated"
    );

    Ok((StatusCode::OK, Json(item_response(entity))))
}

/// Delete an inventory item, unassigning it from every employee first.
///
/// DELETE /api/v1/inventory/{id}
pub async fn delete_inventory(
    State(state): State<AppState>,
    AuthEmployee(auth): AuthEmployee,
    Path(inventory_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let inventory_repo = InventoryRepository::new(state.pool.clone());

    let deleted = inventory_repo.delete_unassigning(inventory_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Inventory not found".to_string()));
    }

    info!(
        inventory_id = %inventory_id,
        deleted_by = %auth.employee_id,
        "Inventory item deleted"
    );

    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Inventory and assigned quantities deleted successfully".to_string(),
        }),
    ))
}
