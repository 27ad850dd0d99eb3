//! Issue/return workflow and operation ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        operation::{
            IssueRequest, MoveRequest, Operation, OperationQuery, RepairRequest, ReturnRequest,
            WriteOffRequest,
        },
        user::Capability,
    },
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson};

#[derive(Serialize, ToSchema)]
pub struct OperationPage {
    pub operations: Vec<Operation>,
    pub total: i64,
}

/// List operations, oldest first
#[utoipa::path(
    get,
    path = "/operations",
    tag = "operations",
    security(("bearer_auth" = [])),
    params(OperationQuery),
    responses(
        (status = 200, description = "Operations page", body = OperationPage),
        (status = 403, description = "Not allowed to read the ledger")
    )
)]
pub async fn list_operations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<OperationQuery>,
) -> AppResult<Json<OperationPage>> {
    claims.require(Capability::ReadLedger)?;

    let (operations, total) = state.services.operations.list(&query).await?;
    Ok(Json(OperationPage { operations, total }))
}

#[utoipa::path(
    get,
    path = "/operations/{id}",
    tag = "operations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Operation ID")
    ),
    responses(
        (status = 200, description = "Operation", body = Operation),
        (status = 404, description = "Operation not found")
    )
)]
pub async fn get_operation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Operation>> {
    claims.require(Capability::ReadLedger)?;

    let operation = state.services.operations.get_by_id(id).await?;
    Ok(Json(operation))
}

/// Issue in-stock equipment to an active user
#[utoipa::path(
    post,
    path = "/operations/issue",
    tag = "operations",
    security(("bearer_auth" = [])),
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Equipment issued", body = Operation),
        (status = 404, description = "Equipment or user not found"),
        (status = 409, description = "Equipment is not in stock"),
        (status = 503, description = "Equipment is locked by another operation")
    )
)]
pub async fn issue(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<IssueRequest>,
) -> AppResult<(StatusCode, Json<Operation>)> {
    claims.require(Capability::IssueReturn)?;

    let operation = state.services.operations.issue(claims.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// Return issued equipment
#[utoipa::path(
    post,
    path = "/operations/return",
    tag = "operations",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 201, description = "Equipment returned", body = Operation),
        (status = 400, description = "Unknown condition"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is not issued"),
        (status = 503, description = "Equipment is locked by another operation")
    )
)]
pub async fn return_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ReturnRequest>,
) -> AppResult<(StatusCode, Json<Operation>)> {
    claims.require(Capability::IssueReturn)?;

    let operation = state
        .services
        .operations
        .return_equipment(claims.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// Move equipment to another location
#[utoipa::path(
    post,
    path = "/operations/move",
    tag = "operations",
    security(("bearer_auth" = [])),
    request_body = MoveRequest,
    responses(
        (status = 201, description = "Equipment moved", body = Operation),
        (status = 400, description = "Equipment is already at that location"),
        (status = 404, description = "Equipment or location not found"),
        (status = 409, description = "Equipment is written off")
    )
)]
pub async fn move_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<MoveRequest>,
) -> AppResult<(StatusCode, Json<Operation>)> {
    claims.require(Capability::IssueReturn)?;

    let operation = state
        .services
        .operations
        .move_equipment(claims.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// Send equipment to repair, or bring it back with `completed: true`
#[utoipa::path(
    post,
    path = "/operations/repair",
    tag = "operations",
    security(("bearer_auth" = [])),
    request_body = RepairRequest,
    responses(
        (status = 201, description = "Repair recorded", body = Operation),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Status does not allow this repair step")
    )
)]
pub async fn repair(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<RepairRequest>,
) -> AppResult<(StatusCode, Json<Operation>)> {
    claims.require(Capability::IssueReturn)?;

    let operation = state.services.operations.repair(claims.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// Write equipment off permanently
#[utoipa::path(
    post,
    path = "/operations/write-off",
    tag = "operations",
    security(("bearer_auth" = [])),
    request_body = WriteOffRequest,
    responses(
        (status = 201, description = "Equipment written off", body = Operation),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is issued or already written off")
    )
)]
pub async fn write_off(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<WriteOffRequest>,
) -> AppResult<(StatusCode, Json<Operation>)> {
    claims.require(Capability::IssueReturn)?;

    let operation = state
        .services
        .operations
        .write_off(claims.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(operation)))
}
