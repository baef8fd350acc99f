//! Inventory item domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request body for creating an inventory item.
///
/// `available_qty` defaults to the total quantity when omitted: a freshly
/// created item has its whole stock on the shelf.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_stock_bounds"))]
pub struct CreateInventoryItemRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub category: String,

    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative_quantity"))]
    pub total_quantity: i32,

    pub available_qty: Option<i32>,

    pub image_url: Option<String>,
}

fn validate_stock_bounds(req: &CreateInventoryItemRequest) -> Result<(), ValidationError> {
    if let Some(available) = req.available_qty {
        if available < 0 || available > req.total_quantity {
            let mut err = ValidationError::new("stock_bounds");
            err.message = Some("availableQty must be between 0 and totalQuantity".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Request body for editing an inventory item. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative_quantity"))]
    pub total_quantity: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_non_negative_quantity"))]
    pub available_qty: Option<i32>,

    pub image_url: Option<String>,
}

/// Inventory item representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub total_quantity: i32,
    pub available_qty: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paged inventory listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInventoryResponse {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub data: Vec<InventoryItemResponse>,
}
