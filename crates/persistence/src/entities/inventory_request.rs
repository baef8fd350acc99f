//! Inventory request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{RequestStatus, RequestType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<RequestStatusDb> for RequestStatus {
    fn from(status: RequestStatusDb) -> Self {
        match status {
            RequestStatusDb::Pending => RequestStatus::Pending,
            RequestStatusDb::Approved => RequestStatus::Approved,
            RequestStatusDb::Rejected => RequestStatus::Rejected,
        }
    }
}

impl From<RequestStatus> for RequestStatusDb {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => RequestStatusDb::Pending,
            RequestStatus::Approved => RequestStatusDb::Approved,
            RequestStatus::Rejected => RequestStatusDb::Rejected,
        }
    }
}

/// Database enum for request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_type", rename_all = "lowercase")]
pub enum RequestTypeDb {
    New,
    Exchange,
}

impl From<RequestTypeDb> for RequestType {
    fn from(request_type: RequestTypeDb) -> Self {
        match request_type {
            RequestTypeDb::New => RequestType::New,
            RequestTypeDb::Exchange => RequestType::Exchange,
        }
    }
}

impl From<RequestType> for RequestTypeDb {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::New => RequestTypeDb::New,
            RequestType::Exchange => RequestTypeDb::Exchange,
        }
    }
}

/// Database row mapping for the inventory_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryRequestEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub inventory_id: Uuid,
    pub request_type: RequestTypeDb,
    pub reason: String,
    pub status: RequestStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request joined with employee and item names for listing.
#[derive(Debug, Clone, FromRow)]
pub struct RequestWithNamesEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub desk_number: String,
    pub inventory_id: Uuid,
    pub inventory_name: String,
    pub request_type: RequestTypeDb,
    pub reason: String,
    pub status: RequestStatusDb,
    pub created_at: DateTime<Utc>,
}
