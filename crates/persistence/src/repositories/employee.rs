//! Employee repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EmployeeEntity, EmployeeRoleDb};
use crate::metrics::QueryTimer;
use crate::repositories::inventory::{release_stock, reserve_stock, StockError};

/// Fields for creating an employee record.
#[derive(Debug, Clone)]
pub struct NewEmployee<'a> {
    pub name: &'a str,
    pub department: &'a str,
    pub desk_number: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub age: Option<i32>,
    pub gender: Option<&'a str>,
    pub role: EmployeeRoleDb,
    pub password_hash: &'a str,
}

/// Repository for employee-related database operations.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an employee together with their initial inventory
    /// assignments, reserving stock for each in the same transaction.
    ///
    /// Any reservation failure rolls back the whole creation.
    pub async fn create(
        &self,
        employee: NewEmployee<'_>,
        initial_assignments: &[(Uuid, i32)],
    ) -> Result<EmployeeEntity, StockError> {
        let timer = QueryTimer::new("create_employee");
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            INSERT INTO employees (name, department, desk_number, email, phone, age, gender, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, department, desk_number, email, phone, age, gender, role,
                      password_hash, created_at, updated_at
            "#,
        )
        .bind(employee.name)
        .bind(employee.department)
        .bind(employee.desk_number)
        .bind(employee.email)
        .bind(employee.phone)
        .bind(employee.age)
        .bind(employee.gender)
        .bind(employee.role)
        .bind(employee.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        for (inventory_id, qty) in initial_assignments {
            reserve_stock(&mut tx, *inventory_id, *qty).await?;

            sqlx::query(
                r#"
                INSERT INTO assigned_inventory (employee_id, inventory_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (employee_id, inventory_id)
                DO UPDATE SET quantity = assigned_inventory.quantity + EXCLUDED.quantity
                "#,
            )
            .bind(entity.id)
            .bind(inventory_id)
            .bind(qty)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    /// Find an employee by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, department, desk_number, email, phone, age, gender, role,
                   password_hash, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an employee by email (login credential).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_email");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, department, desk_number, email, phone, age, gender, role,
                   password_hash, created_at, updated_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an employee by case-insensitive exact match on name and desk
    /// number, the resolution used by request submission.
    pub async fn find_by_name_and_desk(
        &self,
        name: &str,
        desk_number: &str,
    ) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_name_and_desk");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, department, desk_number, email, phone, age, gender, role,
                   password_hash, created_at, updated_at
            FROM employees
            WHERE LOWER(name) = LOWER($1) AND LOWER(desk_number) = LOWER($2)
            "#,
        )
        .bind(name.trim())
        .bind(desk_number.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List employees filtered by an optional case-insensitive name
    /// substring, oldest first.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_employees");
        let pattern = search.map(|s| format!("%{}%", s));
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, department, desk_number, email, phone, age, gender, role,
                   password_hash, created_at, updated_at
            FROM employees
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count employees matching an optional name search.
    pub async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_employees");
        let pattern = search.map(|s| format!("%{}%", s));
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All (name, desk_number) pairs, for the request submission form.
    pub async fn list_name_desk_pairs(&self) -> Result<Vec<(String, String)>, sqlx::Error> {
        let timer = QueryTimer::new("list_employee_name_desk_pairs");
        let result = sqlx::query_as::<_, (String, String)>(
            "SELECT name, desk_number FROM employees ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update to an employee's profile fields. Unset
    /// fields keep their value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        department: Option<&str>,
        desk_number: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        age: Option<i32>,
        gender: Option<&str>,
    ) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_employee");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            UPDATE employees
            SET name = COALESCE($2, name),
                department = COALESCE($3, department),
                desk_number = COALESCE($4, desk_number),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                age = COALESCE($7, age),
                gender = COALESCE($8, gender),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, department, desk_number, email, phone, age, gender, role,
                      password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(department)
        .bind(desk_number)
        .bind(email)
        .bind(phone)
        .bind(age)
        .bind(gender)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an employee, first returning every assigned quantity to the
    /// corresponding item's available stock.
    ///
    /// Returns false when the employee does not exist.
    pub async fn delete_restoring_stock(&self, id: Uuid) -> Result<bool, StockError> {
        let timer = QueryTimer::new("delete_employee");
        let mut tx = self.pool.begin().await?;

        let assignments = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT inventory_id, quantity FROM assigned_inventory WHERE employee_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (inventory_id, qty) in assignments {
            release_stock(&mut tx, inventory_id, qty).await?;
        }

        // Assignment rows and request history go with the employee (FK cascade).
        let affected = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        timer.record();
        Ok(affected == 1)
    }
}
