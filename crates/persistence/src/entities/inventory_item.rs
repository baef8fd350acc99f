//! Inventory item entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the inventory_items table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryItemEntity {
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
