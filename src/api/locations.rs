//! Location tree endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        location::{CreateLocation, Location, UpdateLocation},
        user::Capability,
    },
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson};

/// List all locations ordered by name
#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of locations", body = Vec<Location>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Location>>> {
    claims.require(Capability::ReadCatalog)?;

    let locations = state.services.locations.list().await?;
    Ok(Json(locations))
}

#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location", body = Location),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Location>> {
    claims.require(Capability::ReadCatalog)?;

    let location = state.services.locations.get_by_id(id).await?;
    Ok(Json(location))
}

/// Direct children of a location
#[utoipa::path(
    get,
    path = "/locations/{id}/children",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Child locations", body = Vec<Location>),
        (status = 404, description = "Location not found")
    )
)]
pub async fn list_children(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Location>>> {
    claims.require(Capability::ReadCatalog)?;

    let children = state.services.locations.children(id).await?;
    Ok(Json(children))
}

#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Parent not found"),
        (status = 409, description = "Sibling with the same name exists")
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    claims.require(Capability::WriteCatalog)?;

    let created = state.services.locations.create(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a location. `parent_id: null` moves it to the root.
#[utoipa::path(
    put,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Location ID")
    ),
    request_body = UpdateLocation,
    responses(
        (status = 200, description = "Location updated", body = Location),
        (status = 400, description = "Parent would create a cycle"),
        (status = 404, description = "Location or parent not found"),
        (status = 409, description = "Sibling with the same name exists")
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<UpdateLocation>,
) -> AppResult<Json<Location>> {
    claims.require(Capability::WriteCatalog)?;

    let updated = state.services.locations.update(id, &data).await?;
    Ok(Json(updated))
}

/// Delete a location; children become roots
#[utoipa::path(
    delete,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Location ID")
    ),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn delete_location(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Capability::WriteCatalog)?;

    state.services.locations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
