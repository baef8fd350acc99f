//! Inventory repository: item CRUD and the stock ledger.
//!
//! All `available_qty` mutations in the system go through `reserve_stock`
//! and `release_stock`. Both are conditional updates so that concurrent
//! callers can never drive the counter negative or past `total_quantity`.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::InventoryItemEntity;
use crate::metrics::QueryTimer;

/// Errors from stock ledger operations.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Inventory item not found")]
    ItemNotFound,

    #[error("No stock available")]
    Insufficient,

    #[error("Release would exceed the item's total quantity")]
    ExceedsTotal,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Reserves `qty` units of an item inside an open transaction.
///
/// The decrement only applies while `available_qty >= qty`; zero rows
/// affected means there is not enough stock and the caller must roll back.
pub(crate) async fn reserve_stock(
    conn: &mut PgConnection,
    inventory_id: Uuid,
    qty: i32,
) -> Result<(), StockError> {
    let affected = sqlx::query(
        r#"
        UPDATE inventory_items
        SET available_qty = available_qty - $2, updated_at = NOW()
        WHERE id = $1 AND available_qty >= $2
        "#,
    )
    .bind(inventory_id)
    .bind(qty)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 1 {
        return Ok(());
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM inventory_items WHERE id = $1)",
    )
    .bind(inventory_id)
    .fetch_one(&mut *conn)
    .await?;

    if exists {
        Err(StockError::Insufficient)
    } else {
        Err(StockError::ItemNotFound)
    }
}

/// Returns `qty` units of an item to the shelf inside an open transaction.
///
/// The increment is capped at `total_quantity`; pushing past it means the
/// ledger and the assignment records disagree, which is surfaced as a
/// conflict instead of silently inflating the counter.
pub(crate) async fn release_stock(
    conn: &mut PgConnection,
    inventory_id: Uuid,
    qty: i32,
) -> Result<(), StockError> {
    let affected = sqlx::query(
        r#"
        UPDATE inventory_items
        SET available_qty = available_qty + $2, updated_at = NOW()
        WHERE id = $1 AND available_qty + $2 <= total_quantity
        "#,
    )
    .bind(inventory_id)
    .bind(qty)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if affected == 1 {
        return Ok(());
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM inventory_items WHERE id = $1)",
    )
    .bind(inventory_id)
    .fetch_one(&mut *conn)
    .await?;

    if exists {
        Err(StockError::ExceedsTotal)
    } else {
        Err(StockError::ItemNotFound)
    }
}

/// Repository for inventory item database operations.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new inventory item.
    pub async fn create(
        &self,
        name: &str,
        category: &str,
        description: Option<&str>,
        total_quantity: i32,
        available_qty: i32,
        image_url: Option<&str>,
    ) -> Result<InventoryItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_inventory_item");
        let result = sqlx::query_as::<_, InventoryItemEntity>(
            r#"
            INSERT INTO inventory_items (name, category, description, total_quantity, available_qty, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, description, total_quantity, available_qty,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(total_quantity)
        .bind(available_qty)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_inventory_item_by_id");
        let result = sqlx::query_as::<_, InventoryItemEntity>(
            r#"
            SELECT id, name, category, description, total_quantity, available_qty,
                   image_url, created_at, updated_at
            FROM inventory_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item by case-insensitive exact name match.
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<InventoryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_inventory_item_by_name");
        let result = sqlx::query_as::<_, InventoryItemEntity>(
            r#"
            SELECT id, name, category, description, total_quantity, available_qty,
                   image_url, created_at, updated_at
            FROM inventory_items
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List items, newest first.
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InventoryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_inventory_items");
        let result = sqlx::query_as::<_, InventoryItemEntity>(
            r#"
            SELECT id, name, category, description, total_quantity, available_qty,
                   image_url, created_at, updated_at
            FROM inventory_items
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count all items.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_inventory_items");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All item names, for the request submission form.
    pub async fn list_names(&self) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_inventory_item_names");
        let result =
            sqlx::query_scalar::<_, String>("SELECT name FROM inventory_items ORDER BY name")
                .fetch_all(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Apply a partial update to an item. Unset fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        category: Option<&str>,
        description: Option<&str>,
        total_quantity: Option<i32>,
        available_qty: Option<i32>,
        image_url: Option<&str>,
    ) -> Result<Option<InventoryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_inventory_item");
        let result = sqlx::query_as::<_, InventoryItemEntity>(
            r#"
            UPDATE inventory_items
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                total_quantity = COALESCE($5, total_quantity),
                available_qty = COALESCE($6, available_qty),
                image_url = COALESCE($7, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, category, description, total_quantity, available_qty,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(total_quantity)
        .bind(available_qty)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reserve stock for an item (standalone, outside any larger transaction).
    pub async fn reserve(&self, inventory_id: Uuid, qty: i32) -> Result<(), StockError> {
        let timer = QueryTimer::new("reserve_stock");
        let mut conn = self.pool.acquire().await?;
        let result = reserve_stock(&mut conn, inventory_id, qty).await;
        timer.record();
        result
    }

    /// Release stock for an item (standalone, outside any larger transaction).
    pub async fn release(&self, inventory_id: Uuid, qty: i32) -> Result<(), StockError> {
        let timer = QueryTimer::new("release_stock");
        let mut conn = self.pool.acquire().await?;
        let result = release_stock(&mut conn, inventory_id, qty).await;
        timer.record();
        result
    }

    /// Delete an item, unassigning it from every employee first.
    ///
    /// Assignment rows and the item's request history go with the item;
    /// the interim refund the unassignment implies is subsumed by the row
    /// removal itself. Returns false when the item does not exist.
    pub async fn delete_unassigning(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_inventory_item");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM assigned_inventory WHERE inventory_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let affected = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        timer.record();
        Ok(affected == 1)
    }
}
