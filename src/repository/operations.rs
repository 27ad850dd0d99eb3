//! Operation ledger repository (append-only)

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        operation::{ActionCount, Operation, OperationQuery, OverdueEntry, ReportQuery, ReportRow},
        transition::LedgerEntry,
    },
};

use super::page_bounds;

#[derive(Clone)]
pub struct OperationsRepository {
    pool: Pool<Postgres>,
}

impl OperationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append a ledger row inside the caller's transaction
    pub async fn append(
        &self,
        conn: &mut PgConnection,
        equipment_id: Uuid,
        actor_id: i32,
        entry: &LedgerEntry,
        notes: &str,
    ) -> AppResult<Operation> {
        let row = sqlx::query_as::<_, Operation>(
            r#"
            INSERT INTO operations (
                equipment_id, action_type, user_id, target_user_id,
                location_from_id, location_to_id, condition, notes, created_at, due_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(entry.action_type)
        .bind(actor_id)
        .bind(entry.target_user_id)
        .bind(entry.location_from_id)
        .bind(entry.location_to_id)
        .bind(entry.condition)
        .bind(notes)
        .bind(Utc::now())
        .bind(entry.due_at)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Operation> {
        sqlx::query_as::<_, Operation>("SELECT * FROM operations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Operation {} not found", id)))
    }

    /// List ledger entries with optional filters, oldest first
    pub async fn list(&self, query: &OperationQuery) -> AppResult<(Vec<Operation>, i64)> {
        let (limit, offset) = page_bounds(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.equipment_id.is_some() {
            conditions.push(format!("equipment_id = ${}", idx));
            idx += 1;
        }
        if query.action_type.is_some() {
            conditions.push(format!("action_type = ${}", idx));
            idx += 1;
        }
        if query.user_id.is_some() {
            conditions.push(format!("user_id = ${}", idx));
            idx += 1;
        }
        if query.start.is_some() {
            conditions.push(format!("created_at >= ${}", idx));
            idx += 1;
        }
        if query.end.is_some() {
            conditions.push(format!("created_at <= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        macro_rules! bind_filters {
            ($builder:ident) => {
                if let Some(id) = query.equipment_id { $builder = $builder.bind(id); }
                if let Some(action) = query.action_type { $builder = $builder.bind(action); }
                if let Some(id) = query.user_id { $builder = $builder.bind(id); }
                if let Some(start) = query.start { $builder = $builder.bind(start); }
                if let Some(end) = query.end { $builder = $builder.bind(end); }
            };
        }

        let count_q = format!("SELECT COUNT(*) FROM operations {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        bind_filters!(count_builder);
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM operations {} ORDER BY created_at, id LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let mut builder = sqlx::query_as::<_, Operation>(&select_q);
        bind_filters!(builder);
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Full history of one equipment item, oldest first
    pub async fn history(&self, equipment_id: Uuid) -> AppResult<Vec<Operation>> {
        let rows = sqlx::query_as::<_, Operation>(
            "SELECT * FROM operations WHERE equipment_id = $1 ORDER BY created_at, id",
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Issued equipment whose latest issue is past due at `now`
    pub async fn overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueEntry>> {
        let rows = sqlx::query_as::<_, OverdueEntry>(
            r#"
            SELECT o.id AS operation_id, e.id AS equipment_id, e.name AS equipment_name,
                   COALESCE(u.username, '') AS target_user, o.due_at
            FROM equipment e
            JOIN LATERAL (
                SELECT op.id, op.target_user_id, op.due_at
                FROM operations op
                WHERE op.equipment_id = e.id AND op.action_type = 'issue'
                ORDER BY op.created_at DESC, op.id DESC
                LIMIT 1
            ) o ON TRUE
            LEFT JOIN users u ON u.id = o.target_user_id
            WHERE e.status = 'issued'
              AND o.due_at IS NOT NULL
              AND o.due_at < $1
            ORDER BY o.due_at, e.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_action(&self) -> AppResult<Vec<ActionCount>> {
        let rows = sqlx::query_as::<_, ActionCount>(
            r#"
            SELECT action_type, COUNT(*) AS count
            FROM operations
            GROUP BY action_type
            ORDER BY count DESC, action_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Ledger rows joined with names, for reporting
    pub async fn report(&self, query: &ReportQuery) -> AppResult<Vec<ReportRow>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT o.id, o.equipment_id, e.name AS equipment_name, o.action_type,
                   u.username AS "user", COALESCE(t.username, '') AS target_user,
                   o.created_at AS "timestamp", o.notes
            FROM operations o
            JOIN equipment e ON e.id = o.equipment_id
            JOIN users u ON u.id = o.user_id
            LEFT JOIN users t ON t.id = o.target_user_id
            WHERE ($1::timestamptz IS NULL OR o.created_at >= $1)
              AND ($2::timestamptz IS NULL OR o.created_at <= $2)
            ORDER BY o.created_at, o.id
            "#,
        )
        .bind(query.start)
        .bind(query.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
