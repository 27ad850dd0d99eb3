//! Equipment registry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        equipment::{
            CreateEquipment, Equipment, EquipmentQuery, ScanLookup, ScanResult, UpdateEquipment,
        },
        operation::Operation,
        user::Capability,
    },
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson};

/// One page of equipment plus the total matching the filters
#[derive(Serialize, ToSchema)]
pub struct EquipmentPage {
    pub equipment: Vec<Equipment>,
    pub total: i64,
}

/// List equipment with filters and pagination
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment page", body = EquipmentPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<EquipmentPage>> {
    claims.require(Capability::ReadCatalog)?;

    let (equipment, total) = state.services.equipment.list(&query).await?;
    Ok(Json(EquipmentPage { equipment, total }))
}

#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Equipment>> {
    claims.require(Capability::ReadCatalog)?;

    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Register new equipment; it starts in stock with no holder
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Category or location not found")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require(Capability::WriteCatalog)?;

    let created = state.services.equipment.create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update descriptive fields
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment or category not found")
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(data): ValidatedJson<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require(Capability::WriteCatalog)?;

    let updated = state.services.equipment.update(id, &data).await?;
    Ok(Json(updated))
}

/// Delete equipment together with its operation history
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require(Capability::WriteCatalog)?;

    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Operation history of one item, oldest first
#[utoipa::path(
    get,
    path = "/equipment/{id}/operations",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Operation history", body = Vec<Operation>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn equipment_history(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Operation>>> {
    claims.require(Capability::ReadLedger)?;

    let history = state.services.equipment.history(id).await?;
    Ok(Json(history))
}

/// Resolve a scanned QR payload to an equipment summary
#[utoipa::path(
    post,
    path = "/scan",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = ScanLookup,
    responses(
        (status = 200, description = "Scanned equipment", body = ScanResult),
        (status = 400, description = "Payload is not an equipment identifier"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn scan_lookup(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(lookup): ValidatedJson<ScanLookup>,
) -> AppResult<Json<ScanResult>> {
    claims.require(Capability::ReadCatalog)?;

    let result = state.services.equipment.scan_lookup(&lookup).await?;
    Ok(Json(result))
}
