//! Employee domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role of an employee account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Employee,
}

impl Default for EmployeeRole {
    fn default() -> Self {
        EmployeeRole::Employee
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeRole::Admin => write!(f, "admin"),
            EmployeeRole::Employee => write!(f, "employee"),
        }
    }
}

impl std::str::FromStr for EmployeeRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(EmployeeRole::Admin),
            "employee" => Ok(EmployeeRole::Employee),
            _ => Err(()),
        }
    }
}

/// An initial inventory assignment submitted with employee creation or
/// update, identifying the item by name.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NamedAssignment {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub inventory_name: String,

    #[validate(custom(function = "shared::validation::validate_positive_quantity"))]
    pub quantity: i32,
}

/// Request body for creating an employee.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub department: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub desk_number: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_age"))]
    pub age: Option<i32>,

    pub gender: Option<String>,

    #[serde(default)]
    pub role: Option<EmployeeRole>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(nested)]
    pub assigned_inventory: Vec<NamedAssignment>,
}

/// Request body for updating an employee. All fields optional; assignment
/// entries set the target quantity for the named item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub desk_number: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_age"))]
    pub age: Option<i32>,

    pub gender: Option<String>,

    #[validate(nested)]
    pub assigned_inventory: Option<Vec<NamedAssignment>>,
}

/// One entry of an employee's assigned inventory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedEntry {
    pub inventory_id: Uuid,
    pub quantity: i32,
}

/// Employee representation returned by the API. Never carries credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub desk_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub role: EmployeeRole,
    pub assigned_inventory: Vec<AssignedEntry>,
    pub created_at: DateTime<Utc>,
}

/// Paged employee listing, mirroring the dashboard's expectations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEmployeesResponse {
    pub employees: Vec<EmployeeResponse>,
    pub total_employees: i64,
    pub total_pages: i64,
    pub current_page: u32,
}

/// An assigned inventory entry resolved with item details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedItemDetail {
    pub inventory_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub description: Option<String>,
}

/// Request body for assigning inventory directly to an employee.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignInventoryRequest {
    pub inventory_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_positive_quantity"))]
    pub quantity: i32,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Brief employee profile returned with a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEmployeeBrief {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub desk_number: String,
}

/// Login response carrying the session token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub employee: LoginEmployeeBrief,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(EmployeeRole::Admin.to_string(), "admin");
        assert_eq!(EmployeeRole::Employee.to_string(), "employee");
    }

    #[test]
    fn test_role_default_is_employee() {
        assert_eq!(EmployeeRole::default(), EmployeeRole::Employee);
    }

    #[test]
    fn test_create_employee_deserialize() {
        let json = r#"{
            "name": "Jane Smith",
            "department": "Engineering",
            "deskNumber": "D-042",
            "email": "jane@stocksync.app",
            "password": "generated-password",
            "assignedInventory": [
                {"inventoryName": "Dell Monitor", "quantity": 2}
            ]
        }"#;
        let req: CreateEmployeeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.desk_number, "D-042");
        assert_eq!(req.assigned_inventory.len(), 1);
        assert_eq!(req.assigned_inventory[0].quantity, 2);
        assert!(req.role.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_employee_rejects_bad_email() {
        let json = r#"{
            "name": "Jane Smith",
            "department": "Engineering",
            "deskNumber": "D-042",
            "email": "not-an-email",
            "password": "generated-password"
        }"#;
        let req: CreateEmployeeRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_employee_rejects_zero_quantity_assignment() {
        let json = r#"{
            "name": "Jane Smith",
            "department": "Engineering",
            "deskNumber": "D-042",
            "email": "jane@stocksync.app",
            "password": "generated-password",
            "assignedInventory": [{"inventoryName": "Dell Monitor", "quantity": 0}]
        }"#;
        let req: CreateEmployeeRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_employee_response_omits_password() {
        // Compile-time guarantee really; assert the serialized shape anyway.
        let response = EmployeeResponse {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            department: "Engineering".into(),
            desk_number: "D-042".into(),
            email: "jane@stocksync.app".into(),
            phone: None,
            age: Some(30),
            gender: None,
            role: EmployeeRole::Employee,
            assigned_inventory: vec![],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["deskNumber"], "D-042");
    }
}
