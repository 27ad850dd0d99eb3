//! Ledger statistics and reports

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        operation::{OperationStats, ReportQuery, ReportRow},
        user::Capability,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Operation counts, total and per action type
#[utoipa::path(
    get,
    path = "/reports/stats",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Operation statistics", body = OperationStats),
        (status = 403, description = "Not allowed to read the ledger")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<OperationStats>> {
    claims.require(Capability::ReadLedger)?;

    let stats = state.services.operations.stats().await?;
    Ok(Json(stats))
}

/// Operations in a time range with equipment and user names resolved
#[utoipa::path(
    get,
    path = "/reports/operations",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Report rows", body = Vec<ReportRow>),
        (status = 403, description = "Not allowed to read the ledger")
    )
)]
pub async fn operations_report(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ReportRow>>> {
    claims.require(Capability::ReadLedger)?;

    let rows = state.services.operations.report(&query).await?;
    Ok(Json(rows))
}
