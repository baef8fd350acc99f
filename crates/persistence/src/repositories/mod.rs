//! Repository implementations for database operations.

pub mod assignment;
pub mod employee;
pub mod inventory;
pub mod inventory_request;

pub use assignment::{AssignmentError, AssignmentRepository};
pub use employee::EmployeeRepository;
pub use inventory::{InventoryRepository, StockError};
pub use inventory_request::{InventoryRequestRepository, TransitionError};
