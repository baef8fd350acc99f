//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod assignment;
pub mod employee;
pub mod inventory_item;
pub mod inventory_request;

pub use assignment::{AssignmentEntity, AssignmentWithItemEntity};
pub use employee::{EmployeeEntity, EmployeeRoleDb};
pub use inventory_item::InventoryItemEntity;
pub use inventory_request::{
    InventoryRequestEntity, RequestStatusDb, RequestTypeDb, RequestWithNamesEntity,
};
