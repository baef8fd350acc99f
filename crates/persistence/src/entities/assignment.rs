//! Assigned inventory entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the assigned_inventory table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub employee_id: Uuid,
    pub inventory_id: Uuid,
    pub quantity: i32,
    pub assigned_at: DateTime<Utc>,
}

/// Assignment joined with item details for listing.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentWithItemEntity {
    pub inventory_id: Uuid,
    pub item_name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub quantity: i32,
}
