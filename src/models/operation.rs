//! Operation ledger model and workflow request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{ActionType, Condition};

/// Immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Operation {
    pub id: i64,
    pub equipment_id: Uuid,
    pub action_type: ActionType,
    /// Acting user
    pub user_id: i32,
    /// Recipient of an issue, or the previous holder on return
    pub target_user_id: Option<i32>,
    pub location_from_id: Option<i32>,
    pub location_to_id: Option<i32>,
    /// Set only on return
    pub condition: Option<Condition>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Set only on issue
    pub due_at: Option<DateTime<Utc>>,
}

/// Issue equipment to a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IssueRequest {
    pub equipment_id: Uuid,
    pub target_user_id: i32,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// Take issued equipment back
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReturnRequest {
    pub equipment_id: Uuid,
    pub condition: Condition,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Relocate equipment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MoveRequest {
    pub equipment_id: Uuid,
    pub to_location_id: i32,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Send equipment to repair, or bring it back when `completed` is set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RepairRequest {
    pub equipment_id: Uuid,
    #[serde(default)]
    pub completed: bool,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Retire equipment permanently
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WriteOffRequest {
    pub equipment_id: Uuid,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Ledger list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct OperationQuery {
    pub equipment_id: Option<Uuid>,
    pub action_type: Option<ActionType>,
    pub user_id: Option<i32>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Issued equipment past its due date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OverdueEntry {
    pub operation_id: i64,
    pub equipment_id: Uuid,
    pub equipment_name: String,
    /// Recipient username; empty when the user no longer exists
    pub target_user: String,
    pub due_at: DateTime<Utc>,
}

/// Flattened ledger row for reporting
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportRow {
    pub id: i64,
    pub equipment_id: Uuid,
    pub equipment_name: String,
    pub action_type: ActionType,
    pub user: String,
    pub target_user: String,
    pub timestamp: DateTime<Utc>,
    pub notes: String,
}

/// Report period filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActionCount {
    pub action_type: ActionType,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationStats {
    pub total_operations: i64,
    pub by_action: Vec<ActionCount>,
}
