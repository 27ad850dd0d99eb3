//! Per-user notification inbox

use crate::{error::AppResult, models::notification::Notification, repository::Repository};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.repository
            .notifications
            .list_for_user(user_id, unread_only)
            .await
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, user_id: i32, id: i64) -> AppResult<Notification> {
        self.repository.notifications.mark_read(user_id, id).await
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        self.repository.notifications.mark_all_read(user_id).await
    }
}
