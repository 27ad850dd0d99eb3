//! API handlers for the warehouse REST endpoints

pub mod auth;
pub mod categories;
pub mod equipment;
pub mod health;
pub mod inventory;
pub mod locations;
pub mod notifications;
pub mod openapi;
pub mod operations;
pub mod reports;
pub mod users;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body that has been deserialized and validated.
///
/// Malformed JSON, unknown enum values and `validator` failures become
/// `AppError::Validation`; a missing JSON content type is a bad request.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(_) => {
                    AppError::BadRequest(rejection.body_text())
                }
                _ => AppError::Validation(rejection.body_text()),
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/deactivate", post(users::deactivate_user))
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Locations
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/:id",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        .route("/locations/:id/children", get(locations::list_children))
        // Equipment
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipment/:id/operations", get(equipment::equipment_history))
        .route("/scan", post(equipment::scan_lookup))
        // Operations
        .route("/operations", get(operations::list_operations))
        .route("/operations/:id", get(operations::get_operation))
        .route("/operations/issue", post(operations::issue))
        .route("/operations/return", post(operations::return_equipment))
        .route("/operations/move", post(operations::move_equipment))
        .route("/operations/repair", post(operations::repair))
        .route("/operations/write-off", post(operations::write_off))
        // Reports
        .route("/reports/stats", get(reports::get_stats))
        .route("/reports/operations", get(reports::operations_report))
        // Inventory
        .route(
            "/inventory",
            get(inventory::list_sessions).post(inventory::start_session),
        )
        .route(
            "/inventory/:id",
            get(inventory::get_session).delete(inventory::delete_session),
        )
        .route("/inventory/:id/scan", post(inventory::scan))
        .route("/inventory/:id/finish", post(inventory::finish))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/overdue", get(notifications::overdue))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
