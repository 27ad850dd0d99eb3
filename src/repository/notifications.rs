//! Notifications repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{NotificationKind, Role},
        notification::Notification,
    },
};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one notification per active admin or storekeeper; returns how many
    ///
    /// Deactivated accounts are skipped since they can no longer sign in to read them.
    pub async fn notify_staff(
        &self,
        conn: &mut PgConnection,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> AppResult<u64> {
        let staff_roles: Vec<&str> = Role::ALL
            .iter()
            .filter(|r| r.is_staff())
            .map(Role::as_str)
            .collect();

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, kind, title, message)
            SELECT id, $2, $3, $4 FROM users
            WHERE role = ANY($1) AND is_active
            "#,
        )
        .bind(&staff_roles)
        .bind(kind)
        .bind(title)
        .bind(message)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_for_user(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR NOT is_read)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn mark_read(&self, user_id: i32, id: i64) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
