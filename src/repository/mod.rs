//! Repository layer for database operations

pub mod categories;
pub mod equipment;
pub mod inventory;
pub mod locations;
pub mod notifications;
pub mod operations;
pub mod users;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub locations: locations::LocationsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub operations: operations::OperationsRepository,
    pub inventory: inventory::InventoryRepository,
    pub notifications: notifications::NotificationsRepository,
    lock_timeout_ms: u64,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>, lock_timeout_ms: u64) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            operations: operations::OperationsRepository::new(pool.clone()),
            inventory: inventory::InventoryRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            pool,
            lock_timeout_ms,
        }
    }

    /// Begin a transaction whose row-lock waits are bounded by the configured timeout
    pub async fn begin_locking(&self) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        // SET does not accept bind parameters
        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Round-trip to the database for readiness probes
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Clamp pagination parameters to (limit, offset)
pub(crate) fn page_bounds(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let per_page = per_page.unwrap_or(50).clamp(1, 500);
    let page = page.unwrap_or(1).max(1);
    (per_page, (page - 1).saturating_mul(per_page))
}
