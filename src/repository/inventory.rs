//! Inventory sessions repository

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::inventory::{InventorySession, Reconciliation},
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: Pool<Postgres>,
}

impl InventoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<InventorySession>> {
        let rows = sqlx::query_as::<_, InventorySession>(
            "SELECT * FROM inventory_sessions ORDER BY started_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<InventorySession> {
        sqlx::query_as::<_, InventorySession>("SELECT * FROM inventory_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory session {} not found", id)))
    }

    /// Open a session with an empty scanned set
    pub async fn create(&self, location_id: Option<i32>, created_by: i32) -> AppResult<InventorySession> {
        let row = sqlx::query_as::<_, InventorySession>(
            r#"
            INSERT INTO inventory_sessions (location_id, created_by, started_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(location_id)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Inventory session {} not found", id)));
        }
        Ok(())
    }

    /// Set-add to an open session's scanned list.
    ///
    /// Returns the resulting count, or `None` when no open session matched.
    pub async fn add_scan(&self, id: i32, equipment_id: Uuid) -> AppResult<Option<i64>> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE inventory_sessions
            SET scanned = CASE
                WHEN $2 = ANY(scanned) THEN scanned
                ELSE array_append(scanned, $2)
            END
            WHERE id = $1 AND state = 'open'
            RETURNING cardinality(scanned)::bigint
            "#,
        )
        .bind(id)
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(count)
    }

    /// Fetch and row-lock a session until the surrounding transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<InventorySession> {
        sqlx::query_as::<_, InventorySession>(
            "SELECT * FROM inventory_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inventory session {} not found", id)))
    }

    /// Store the reconciliation and mark the session closed
    pub async fn close(
        &self,
        conn: &mut PgConnection,
        id: i32,
        result: &Reconciliation,
    ) -> AppResult<InventorySession> {
        let row = sqlx::query_as::<_, InventorySession>(
            r#"
            UPDATE inventory_sessions
            SET state = 'closed', finished_at = $2, scanned = $3, missing = $4, extra = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(&result.scanned)
        .bind(&result.missing)
        .bind(&result.extra)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }
}
