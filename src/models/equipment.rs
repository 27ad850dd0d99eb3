//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::EquipmentStatus;

/// Equipment record. The id doubles as the QR payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status: EquipmentStatus,
    /// Current holder; set only while status is `issued`
    pub responsible_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    /// Initial location; later changes go through move operations
    pub location_id: Option<i32>,
}

/// Update equipment request (descriptive fields only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
}

/// Equipment list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EquipmentQuery {
    pub status: Option<EquipmentStatus>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub responsible_user_id: Option<i32>,
    /// Case-insensitive name search
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// QR scan lookup request; either field may carry the identifier
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanLookup {
    pub equipment_id: Option<String>,
    pub qr_data: Option<String>,
}

impl ScanLookup {
    pub fn identifier(&self) -> Option<&str> {
        self.equipment_id
            .as_deref()
            .or(self.qr_data.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Compact equipment view returned by a QR scan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScanResult {
    pub id: Uuid,
    pub name: String,
    pub status: EquipmentStatus,
    pub location_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_identifier_prefers_equipment_id() {
        let lookup = ScanLookup {
            equipment_id: Some(" abc ".to_string()),
            qr_data: Some("def".to_string()),
        };
        assert_eq!(lookup.identifier(), Some("abc"));

        let lookup = ScanLookup {
            equipment_id: None,
            qr_data: Some("def".to_string()),
        };
        assert_eq!(lookup.identifier(), Some("def"));

        let lookup = ScanLookup {
            equipment_id: Some("  ".to_string()),
            qr_data: None,
        };
        assert_eq!(lookup.identifier(), None);
    }

    #[test]
    fn test_update_distinguishes_clear_from_absent() {
        let absent: UpdateEquipment = serde_json::from_str(r#"{"name": "Drill"}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: UpdateEquipment = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let set: UpdateEquipment = serde_json::from_str(r#"{"category_id": 3}"#).unwrap();
        assert_eq!(set.category_id, Some(Some(3)));
    }
}
