//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, categories, equipment, health, inventory, locations, notifications, operations,
    reports, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Smart Warehouse API",
        version = "1.0.0",
        description = "Equipment tracking, issue/return workflow and inventory REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::deactivate_user,
        users::delete_user,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::list_children,
        locations::create_location,
        locations::update_location,
        locations::delete_location,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::equipment_history,
        equipment::scan_lookup,
        // Operations
        operations::list_operations,
        operations::get_operation,
        operations::issue,
        operations::return_equipment,
        operations::move_equipment,
        operations::repair,
        operations::write_off,
        // Reports
        reports::get_stats,
        reports::operations_report,
        // Inventory
        inventory::start_session,
        inventory::list_sessions,
        inventory::get_session,
        inventory::delete_session,
        inventory::scan,
        inventory::finish,
        // Notifications
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
        notifications::overdue,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::EquipmentStatus,
            crate::models::enums::ActionType,
            crate::models::enums::Condition,
            crate::models::enums::NotificationKind,
            crate::models::enums::Role,
            crate::models::enums::SessionState,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Registry
            crate::models::category::EquipmentCategory,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            crate::models::location::Location,
            crate::models::location::CreateLocation,
            crate::models::location::UpdateLocation,
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::ScanLookup,
            crate::models::equipment::ScanResult,
            equipment::EquipmentPage,
            // Operations
            crate::models::operation::Operation,
            crate::models::operation::IssueRequest,
            crate::models::operation::ReturnRequest,
            crate::models::operation::MoveRequest,
            crate::models::operation::RepairRequest,
            crate::models::operation::WriteOffRequest,
            crate::models::operation::OverdueEntry,
            crate::models::operation::ReportRow,
            crate::models::operation::ActionCount,
            crate::models::operation::OperationStats,
            operations::OperationPage,
            // Inventory
            crate::models::inventory::InventorySession,
            crate::models::inventory::StartSession,
            crate::models::inventory::ScanRequest,
            crate::models::inventory::ScanResponse,
            crate::models::inventory::Reconciliation,
            // Notifications
            crate::models::notification::Notification,
            notifications::MarkAllReadResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "categories", description = "Equipment categories"),
        (name = "locations", description = "Location tree"),
        (name = "equipment", description = "Equipment registry"),
        (name = "operations", description = "Issue/return workflow and operation ledger"),
        (name = "reports", description = "Ledger statistics and reports"),
        (name = "inventory", description = "Inventory sessions"),
        (name = "notifications", description = "Notifications and overdue equipment")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
