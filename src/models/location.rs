//! Warehouse location model (tree via parent_id)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
}

/// Update location request.
///
/// `parent_id` distinguishes "leave unchanged" (absent) from "detach" (`null`).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub parent_id: Option<Option<i32>>,
    pub description: Option<String>,
}
