//! Inventory session model and reconciliation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::SessionState;

/// Physical inventory session. `missing` and `extra` are filled on finish.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventorySession {
    pub id: i32,
    /// `None` reconciles the whole warehouse
    pub location_id: Option<i32>,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_by: i32,
    pub scanned: Vec<Uuid>,
    pub missing: Vec<Uuid>,
    pub extra: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartSession {
    pub location_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    pub equipment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanResponse {
    pub scanned_count: i64,
}

/// Result of diffing scanned against expected equipment, each list sorted.
///
/// `Uuid` orders by bytes, which matches the lexicographic order of the
/// canonical lowercase string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reconciliation {
    pub scanned: Vec<Uuid>,
    pub missing: Vec<Uuid>,
    pub extra: Vec<Uuid>,
}

impl Reconciliation {
    pub fn compute(expected: &BTreeSet<Uuid>, scanned: &BTreeSet<Uuid>) -> Self {
        Self {
            scanned: scanned.iter().copied().collect(),
            missing: expected.difference(scanned).copied().collect(),
            extra: scanned.difference(expected).copied().collect(),
        }
    }
}

impl From<&InventorySession> for Reconciliation {
    fn from(session: &InventorySession) -> Self {
        Self {
            scanned: session.scanned.clone(),
            missing: session.missing.clone(),
            extra: session.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_missing_and_extra() {
        // expected {A,B,C}, scanned {B,C,D}
        let expected: BTreeSet<Uuid> = [id(1), id(2), id(3)].into_iter().collect();
        let scanned: BTreeSet<Uuid> = [id(4), id(3), id(2)].into_iter().collect();

        let result = Reconciliation::compute(&expected, &scanned);
        assert_eq!(result.missing, vec![id(1)]);
        assert_eq!(result.extra, vec![id(4)]);
        assert_eq!(result.scanned, vec![id(2), id(3), id(4)]);
    }

    #[test]
    fn test_empty_sets() {
        let none = BTreeSet::new();
        let some: BTreeSet<Uuid> = [id(5)].into_iter().collect();

        let result = Reconciliation::compute(&some, &none);
        assert_eq!(result.missing, vec![id(5)]);
        assert!(result.extra.is_empty() && result.scanned.is_empty());

        let result = Reconciliation::compute(&none, &some);
        assert_eq!(result.extra, vec![id(5)]);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_sorted_matches_string_order() {
        let ids: BTreeSet<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
        let result = Reconciliation::compute(&BTreeSet::new(), &ids);
        let mut as_strings: Vec<String> = result.extra.iter().map(Uuid::to_string).collect();
        let before = as_strings.clone();
        as_strings.sort();
        assert_eq!(as_strings, before);
    }
}
