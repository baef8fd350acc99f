//! Inventory request repository: lifecycle persistence and the approval
//! transaction.
//!
//! Approval applies its stock and assignment side effects, the sibling
//! cascade, and the status finalize in a single transaction. The finalize
//! is conditional on the row still being pending, so a concurrent
//! transition makes the whole transaction roll back with no partial effect.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{InventoryRequestEntity, RequestStatusDb, RequestTypeDb, RequestWithNamesEntity};
use crate::metrics::QueryTimer;
use crate::repositories::inventory::{reserve_stock, StockError};

/// Errors from request transition operations.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Request not found")]
    RequestNotFound,

    #[error("Request was already resolved")]
    AlreadyResolved,

    #[error("No stock available")]
    InsufficientStock,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StockError> for TransitionError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Insufficient => TransitionError::InsufficientStock,
            // The request row references the item, so a missing item on
            // approval means it was deleted mid-flight.
            StockError::ItemNotFound => TransitionError::RequestNotFound,
            StockError::ExceedsTotal => {
                TransitionError::Database(sqlx::Error::Protocol(
                    "stock release exceeded total during approval".into(),
                ))
            }
            StockError::Database(e) => TransitionError::Database(e),
        }
    }
}

/// Repository for inventory request database operations.
#[derive(Clone)]
pub struct InventoryRequestRepository {
    pool: PgPool,
}

impl InventoryRequestRepository {
    /// Creates a new InventoryRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new request in the pending state.
    pub async fn create(
        &self,
        employee_id: Uuid,
        inventory_id: Uuid,
        request_type: RequestTypeDb,
        reason: &str,
    ) -> Result<InventoryRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_inventory_request");
        let result = sqlx::query_as::<_, InventoryRequestEntity>(
            r#"
            INSERT INTO inventory_requests (employee_id, inventory_id, request_type, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, employee_id, inventory_id, request_type, reason, status,
                      created_at, updated_at
            "#,
        )
        .bind(employee_id)
        .bind(inventory_id)
        .bind(request_type)
        .bind(reason)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a request by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InventoryRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_inventory_request_by_id");
        let result = sqlx::query_as::<_, InventoryRequestEntity>(
            r#"
            SELECT id, employee_id, inventory_id, request_type, reason, status,
                   created_at, updated_at
            FROM inventory_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether any request for the (employee, item) pair carries the given
    /// status. Backs the duplicate-pending and permanent-rejection rules.
    pub async fn exists_with_status(
        &self,
        employee_id: Uuid,
        inventory_id: Uuid,
        status: RequestStatusDb,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("inventory_request_exists_with_status");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM inventory_requests
                WHERE employee_id = $1 AND inventory_id = $2 AND status = $3
            )
            "#,
        )
        .bind(employee_id)
        .bind(inventory_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all requests with employee and item names resolved, newest first.
    pub async fn list_with_names(&self) -> Result<Vec<RequestWithNamesEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_inventory_requests");
        let result = sqlx::query_as::<_, RequestWithNamesEntity>(
            r#"
            SELECT r.id, r.employee_id, e.name AS employee_name, e.desk_number,
                   r.inventory_id, i.name AS inventory_name,
                   r.request_type, r.reason, r.status, r.created_at
            FROM inventory_requests r
            JOIN employees e ON r.employee_id = e.id
            JOIN inventory_items i ON r.inventory_id = i.id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approve a pending request.
    ///
    /// For a "new" request one unit of stock is reserved and assigned to
    /// the employee; an "exchange" touches no counters. Either way, every
    /// other pending request for the same (employee, item) pair is
    /// auto-rejected before the request itself is finalized.
    pub async fn approve(&self, id: Uuid) -> Result<InventoryRequestEntity, TransitionError> {
        let timer = QueryTimer::new("approve_inventory_request");
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, InventoryRequestEntity>(
            r#"
            SELECT id, employee_id, inventory_id, request_type, reason, status,
                   created_at, updated_at
            FROM inventory_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TransitionError::RequestNotFound)?;

        if request.status != RequestStatusDb::Pending {
            return Err(TransitionError::AlreadyResolved);
        }

        if request.request_type == RequestTypeDb::New {
            reserve_stock(&mut tx, request.inventory_id, 1).await?;

            sqlx::query(
                r#"
                INSERT INTO assigned_inventory (employee_id, inventory_id, quantity)
                VALUES ($1, $2, 1)
                ON CONFLICT (employee_id, inventory_id)
                DO UPDATE SET quantity = assigned_inventory.quantity + 1
                "#,
            )
            .bind(request.employee_id)
            .bind(request.inventory_id)
            .execute(&mut *tx)
            .await?;
        }

        // Auto-reject any sibling pending requests for the same pair.
        sqlx::query(
            r#"
            UPDATE inventory_requests
            SET status = 'rejected', updated_at = NOW()
            WHERE employee_id = $1 AND inventory_id = $2 AND status = 'pending' AND id <> $3
            "#,
        )
        .bind(request.employee_id)
        .bind(request.inventory_id)
        .bind(request.id)
        .execute(&mut *tx)
        .await?;

        // Conditional finalize: a concurrent transition that won the race
        // leaves zero rows here and the transaction rolls back whole.
        let entity = sqlx::query_as::<_, InventoryRequestEntity>(
            r#"
            UPDATE inventory_requests
            SET status = 'approved', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, employee_id, inventory_id, request_type, reason, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TransitionError::AlreadyResolved)?;

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    /// Reject a pending request. Only the status changes; nothing was ever
    /// reserved for a pending request, so there is nothing to refund.
    pub async fn reject(&self, id: Uuid) -> Result<InventoryRequestEntity, TransitionError> {
        let timer = QueryTimer::new("reject_inventory_request");

        let entity = sqlx::query_as::<_, InventoryRequestEntity>(
            r#"
            UPDATE inventory_requests
            SET status = 'rejected', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, employee_id, inventory_id, request_type, reason, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        entity.ok_or(TransitionError::AlreadyResolved)
    }

    /// Delete a request record. Pure removal, no stock side effects.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_inventory_request");
        let affected = sqlx::query("DELETE FROM inventory_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        timer.record();
        Ok(affected == 1)
    }
}
