//! Equipment repository

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentQuery, ScanResult, UpdateEquipment},
        transition::EquipmentState,
    },
};

use super::page_bounds;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters and pagination
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<(Vec<Equipment>, i64)> {
        let (limit, offset) = page_bounds(query.page, query.per_page);
        let search = query.search.as_ref().map(|s| format!("%{}%", s.trim()));

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if query.category_id.is_some() {
            conditions.push(format!("category_id = ${}", idx));
            idx += 1;
        }
        if query.location_id.is_some() {
            conditions.push(format!("location_id = ${}", idx));
            idx += 1;
        }
        if query.responsible_user_id.is_some() {
            conditions.push(format!("responsible_user_id = ${}", idx));
            idx += 1;
        }
        if search.is_some() {
            conditions.push(format!("name ILIKE ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        macro_rules! bind_filters {
            ($builder:ident) => {
                if let Some(status) = query.status { $builder = $builder.bind(status); }
                if let Some(id) = query.category_id { $builder = $builder.bind(id); }
                if let Some(id) = query.location_id { $builder = $builder.bind(id); }
                if let Some(id) = query.responsible_user_id { $builder = $builder.bind(id); }
                if let Some(ref pattern) = search { $builder = $builder.bind(pattern); }
            };
        }

        let count_q = format!("SELECT COUNT(*) FROM equipment {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        bind_filters!(count_builder);
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM equipment {} ORDER BY name, id LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let mut builder = sqlx::query_as::<_, Equipment>(&select_q);
        bind_filters!(builder);
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Resolve a QR payload to a compact view
    pub async fn scan_lookup(&self, id: Uuid) -> AppResult<ScanResult> {
        sqlx::query_as::<_, ScanResult>(
            "SELECT id, name, status, location_id FROM equipment WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Register equipment; new items always start in stock with no holder
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (id, name, description, category_id, location_id, status)
            VALUES ($1, $2, $3, $4, $5, 'in_stock')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(data.description.as_deref().unwrap_or(""))
        .bind(data.category_id)
        .bind(data.location_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update descriptive fields
    pub async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment> {
        let mut sets = vec!["updated_at = $2".to_string()];
        let mut idx = 3;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.description, "description");
        add_field!(data.category_id, "category_id");

        let query = format!(
            "UPDATE equipment SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.category_id);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment together with its operation history
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Fetch and row-lock equipment until the surrounding transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Persist the state produced by a transition
    pub async fn write_state(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        state: &EquipmentState,
    ) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET status = $2, responsible_user_id = $3, location_id = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(state.status)
        .bind(state.responsible_user_id)
        .bind(state.location_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// Identifiers of equipment at `location_id` (all equipment when `None`)
    pub async fn ids_at(
        &self,
        conn: &mut PgConnection,
        location_id: Option<i32>,
    ) -> AppResult<BTreeSet<Uuid>> {
        let ids: Vec<Uuid> = match location_id {
            Some(location_id) => {
                sqlx::query_scalar("SELECT id FROM equipment WHERE location_id = $1")
                    .bind(location_id)
                    .fetch_all(conn)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT id FROM equipment")
                    .fetch_all(conn)
                    .await?
            }
        };
        Ok(ids.into_iter().collect())
    }
}
