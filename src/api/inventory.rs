//! Inventory session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        inventory::{InventorySession, Reconciliation, ScanRequest, ScanResponse, StartSession},
        user::Capability,
    },
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson};

/// Start a session for a location, or the whole warehouse without one
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = StartSession,
    responses(
        (status = 201, description = "Session started", body = InventorySession),
        (status = 404, description = "Location not found")
    )
)]
pub async fn start_session(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<StartSession>,
) -> AppResult<(StatusCode, Json<InventorySession>)> {
    claims.require(Capability::Inventory)?;

    let session = state
        .services
        .inventory
        .start(request.location_id, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sessions, newest first", body = Vec<InventorySession>)
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InventorySession>>> {
    claims.require(Capability::Inventory)?;

    let sessions = state.services.inventory.list().await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session", body = InventorySession),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<InventorySession>> {
    claims.require(Capability::Inventory)?;

    let session = state.services.inventory.get_by_id(id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Capability::Inventory)?;

    state.services.inventory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a scanned equipment id to an open session
#[utoipa::path(
    post,
    path = "/inventory/{id}/scan",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Session ID")
    ),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Number of distinct ids scanned so far", body = ScanResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is closed")
    )
)]
pub async fn scan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    claims.require(Capability::Inventory)?;

    let response = state.services.inventory.scan(id, request.equipment_id).await?;
    Ok(Json(response))
}

/// Close the session and reconcile scanned against expected equipment
#[utoipa::path(
    post,
    path = "/inventory/{id}/finish",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Reconciliation result", body = Reconciliation),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is already closed")
    )
)]
pub async fn finish(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reconciliation>> {
    claims.require(Capability::Inventory)?;

    let result = state.services.inventory.finish(id).await?;
    Ok(Json(result))
}
