//! Employee entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::EmployeeRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for employee roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
pub enum EmployeeRoleDb {
    Admin,
    Employee,
}

impl From<EmployeeRoleDb> for EmployeeRole {
    fn from(role: EmployeeRoleDb) -> Self {
        match role {
            EmployeeRoleDb::Admin => EmployeeRole::Admin,
            EmployeeRoleDb::Employee => EmployeeRole::Employee,
        }
    }
}

impl From<EmployeeRole> for EmployeeRoleDb {
    fn from(role: EmployeeRole) -> Self {
        match role {
            EmployeeRole::Admin => EmployeeRoleDb::Admin,
            EmployeeRole::Employee => EmployeeRoleDb::Employee,
        }
    }
}

/// Database row mapping for the employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub desk_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub role: EmployeeRoleDb,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_db_roundtrip() {
        for role in [EmployeeRole::Admin, EmployeeRole::Employee] {
            assert_eq!(EmployeeRole::from(EmployeeRoleDb::from(role)), role);
        }
    }
}
