//! Locations repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::location::{CreateLocation, Location},
};

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
    }

    /// Location lookup on a transaction connection
    pub async fn find(&self, conn: &mut PgConnection, id: i32) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
    }

    pub async fn children(&self, id: i32) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE parent_id = $1 ORDER BY name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Whether a sibling (same parent, NULL included) already uses `name`
    pub async fn sibling_name_taken(
        &self,
        name: &str,
        parent_id: Option<i32>,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM locations
                WHERE name = $1
                  AND parent_id IS NOT DISTINCT FROM $2
                  AND ($3::int IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(name)
        .bind(parent_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Whether `candidate` is `id` itself or lies in the subtree below `id`
    pub async fn is_in_subtree(&self, id: i32, candidate: i32) -> AppResult<bool> {
        let found: bool = sqlx::query_scalar(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT id FROM locations WHERE id = $1
                UNION
                SELECT l.id FROM locations l JOIN subtree s ON l.parent_id = s.id
            )
            SELECT EXISTS(SELECT 1 FROM subtree WHERE id = $2)
            "#,
        )
        .bind(id)
        .bind(candidate)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    pub async fn create(&self, data: &CreateLocation) -> AppResult<Location> {
        let row = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (name, parent_id, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.description.as_deref().unwrap_or(""))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Write the full editable state of a location
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        parent_id: Option<i32>,
        description: &str,
    ) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations SET name = $2, parent_id = $3, description = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(parent_id)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
    }

    /// Delete a location; children are detached and references cleared
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Location {} not found", id)));
        }
        Ok(())
    }
}
