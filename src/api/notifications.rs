//! Notification inbox and overdue equipment

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        notification::{Notification, NotificationQuery},
        operation::OverdueEntry,
        user::Capability,
    },
    AppState,
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications that were unread
    pub updated: u64,
}

/// The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .services
        .notifications
        .list(claims.user_id, query.unread_only)
        .await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Notification>> {
    let notification = state
        .services
        .notifications
        .mark_read(claims.user_id, id)
        .await?;
    Ok(Json(notification))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All notifications marked read", body = MarkAllReadResponse)
    )
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = state
        .services
        .notifications
        .mark_all_read(claims.user_id)
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Issued equipment whose due date has passed.
///
/// Only the latest issue of each item counts; earlier issues are ignored.
#[utoipa::path(
    get,
    path = "/notifications/overdue",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue equipment, earliest due first", body = Vec<OverdueEntry>),
        (status = 403, description = "Not allowed to view overdue equipment")
    )
)]
pub async fn overdue(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<OverdueEntry>>> {
    claims.require(Capability::ViewOverdue)?;

    let entries = state.services.operations.overdue().await?;
    Ok(Json(entries))
}
