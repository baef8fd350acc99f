//! Assignment registry: per-employee inventory assignments.
//!
//! One row per (employee, item) pair; quantities aggregate on repeat
//! assignment. Every mutation pairs with the corresponding stock ledger
//! movement inside a single transaction.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{AssignmentEntity, AssignmentWithItemEntity};
use crate::metrics::QueryTimer;
use crate::repositories::inventory::{release_stock, reserve_stock, StockError};

/// Errors from assignment registry operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Inventory item not found for employee")]
    AssignmentNotFound,

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for assigned inventory database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List an employee's assignments as raw entries.
    pub async fn entries(&self, employee_id: Uuid) -> Result<Vec<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_assignments");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT employee_id, inventory_id, quantity, assigned_at
            FROM assigned_inventory
            WHERE employee_id = $1
            ORDER BY assigned_at
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an employee's assignments joined with item details.
    pub async fn entries_with_items(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<AssignmentWithItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_assignments_with_items");
        let result = sqlx::query_as::<_, AssignmentWithItemEntity>(
            r#"
            SELECT ai.inventory_id, i.name AS item_name, i.image_url, i.description, ai.quantity
            FROM assigned_inventory ai
            JOIN inventory_items i ON ai.inventory_id = i.id
            WHERE ai.employee_id = $1
            ORDER BY ai.assigned_at
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Assign `qty` units of an item to an employee.
    ///
    /// Reserves the stock and aggregates into any existing entry for the
    /// same item, all in one transaction.
    pub async fn assign(
        &self,
        employee_id: Uuid,
        inventory_id: Uuid,
        qty: i32,
    ) -> Result<(), AssignmentError> {
        let timer = QueryTimer::new("assign_inventory");
        let mut tx = self.pool.begin().await?;

        reserve_stock(&mut tx, inventory_id, qty).await?;

        sqlx::query(
            r#"
            INSERT INTO assigned_inventory (employee_id, inventory_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (employee_id, inventory_id)
            DO UPDATE SET quantity = assigned_inventory.quantity + EXCLUDED.quantity
            "#,
        )
        .bind(employee_id)
        .bind(inventory_id)
        .bind(qty)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// Reduce an employee's assignment of an item.
    ///
    /// With `all = false` one unit goes back to stock and the entry is
    /// removed when it hits zero; with `all = true` the entire quantity is
    /// returned and the entry removed.
    pub async fn reduce(
        &self,
        employee_id: Uuid,
        inventory_id: Uuid,
        all: bool,
    ) -> Result<(), AssignmentError> {
        let timer = QueryTimer::new("reduce_assignment");
        let mut tx = self.pool.begin().await?;

        let returned_qty = if all {
            sqlx::query_scalar::<_, i32>(
                r#"
                DELETE FROM assigned_inventory
                WHERE employee_id = $1 AND inventory_id = $2
                RETURNING quantity
                "#,
            )
            .bind(employee_id)
            .bind(inventory_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AssignmentError::AssignmentNotFound)?
        } else {
            let remaining = sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE assigned_inventory
                SET quantity = quantity - 1
                WHERE employee_id = $1 AND inventory_id = $2 AND quantity > 1
                RETURNING quantity
                "#,
            )
            .bind(employee_id)
            .bind(inventory_id)
            .fetch_optional(&mut *tx)
            .await?;

            match remaining {
                Some(_) => 1,
                None => {
                    // Last unit: drop the entry entirely.
                    sqlx::query_scalar::<_, i32>(
                        r#"
                        DELETE FROM assigned_inventory
                        WHERE employee_id = $1 AND inventory_id = $2
                        RETURNING quantity
                        "#,
                    )
                    .bind(employee_id)
                    .bind(inventory_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(AssignmentError::AssignmentNotFound)?
                }
            }
        };

        release_stock(&mut tx, inventory_id, returned_qty).await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// Set an employee's assignment of an item to a target quantity,
    /// reserving or releasing the difference against the stock ledger.
    ///
    /// A target of zero removes the entry.
    pub async fn set_quantity(
        &self,
        employee_id: Uuid,
        inventory_id: Uuid,
        target_qty: i32,
    ) -> Result<(), AssignmentError> {
        let timer = QueryTimer::new("set_assignment_quantity");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT quantity FROM assigned_inventory
            WHERE employee_id = $1 AND inventory_id = $2
            "#,
        )
        .bind(employee_id)
        .bind(inventory_id)
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or(0);

        let diff = target_qty - current;
        if diff > 0 {
            reserve_stock(&mut tx, inventory_id, diff).await?;
        } else if diff < 0 {
            release_stock(&mut tx, inventory_id, -diff).await?;
        }

        if target_qty == 0 {
            sqlx::query(
                "DELETE FROM assigned_inventory WHERE employee_id = $1 AND inventory_id = $2",
            )
            .bind(employee_id)
            .bind(inventory_id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO assigned_inventory (employee_id, inventory_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (employee_id, inventory_id)
                DO UPDATE SET quantity = EXCLUDED.quantity
                "#,
            )
            .bind(employee_id)
            .bind(inventory_id)
            .bind(target_qty)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}
