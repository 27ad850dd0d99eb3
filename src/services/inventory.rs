//! Inventory sessions: scanning and reconciliation against registered equipment

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::SessionState,
        inventory::{InventorySession, Reconciliation, ScanResponse},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Open a session for a location, or for the whole warehouse when `None`
    pub async fn start(&self, location_id: Option<i32>, created_by: i32) -> AppResult<InventorySession> {
        if let Some(location_id) = location_id {
            self.repository.locations.get_by_id(location_id).await?;
        }
        let session = self.repository.inventory.create(location_id, created_by).await?;
        tracing::info!(
            "Inventory session {} started by user {} (location {:?})",
            session.id,
            created_by,
            location_id
        );
        Ok(session)
    }

    pub async fn list(&self) -> AppResult<Vec<InventorySession>> {
        self.repository.inventory.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<InventorySession> {
        self.repository.inventory.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.inventory.delete(id).await
    }

    /// Record a scanned id. Repeated scans of the same id are no-ops.
    pub async fn scan(&self, id: i32, equipment_id: Uuid) -> AppResult<ScanResponse> {
        match self.repository.inventory.add_scan(id, equipment_id).await? {
            Some(scanned_count) => Ok(ScanResponse { scanned_count }),
            None => {
                // Either unknown or no longer open
                self.repository.inventory.get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Inventory session {} is closed",
                    id
                )))
            }
        }
    }

    /// Close the session and store missing and extra equipment
    pub async fn finish(&self, id: i32) -> AppResult<Reconciliation> {
        let mut tx = self.repository.begin_locking().await?;

        let session = self.repository.inventory.lock(&mut *tx, id).await?;
        if session.state == SessionState::Closed {
            return Err(AppError::Conflict(format!(
                "Inventory session {} is already closed",
                id
            )));
        }

        let expected = self
            .repository
            .equipment
            .ids_at(&mut *tx, session.location_id)
            .await?;
        let scanned: BTreeSet<Uuid> = session.scanned.iter().copied().collect();
        let result = Reconciliation::compute(&expected, &scanned);

        self.repository.inventory.close(&mut *tx, id, &result).await?;
        tx.commit().await?;

        tracing::info!(
            "Inventory session {} finished: {} scanned, {} missing, {} extra",
            id,
            result.scanned.len(),
            result.missing.len(),
            result.extra.len()
        );

        Ok(result)
    }
}
