//! Equipment registry service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{
            CreateEquipment, Equipment, EquipmentQuery, ScanLookup, ScanResult, UpdateEquipment,
        },
        operation::Operation,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<(Vec<Equipment>, i64)> {
        self.repository.equipment.list(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        if let Some(category_id) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }
        if let Some(location_id) = data.location_id {
            self.repository.locations.get_by_id(location_id).await?;
        }

        let equipment = self.repository.equipment.create(data).await?;
        tracing::info!("Registered equipment {} ({})", equipment.name, equipment.id);
        Ok(equipment)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment> {
        if let Some(Some(category_id)) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }
        self.repository.equipment.update(id, data).await
    }

    /// Delete equipment; its operations go with it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!("Equipment {} deleted", id);
        Ok(())
    }

    /// Resolve a scanned QR payload
    pub async fn scan_lookup(&self, lookup: &ScanLookup) -> AppResult<ScanResult> {
        let raw = lookup.identifier().ok_or_else(|| {
            AppError::Validation("equipment_id or qr_data required".to_string())
        })?;
        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::Validation(format!("Not an equipment identifier: {}", raw)))?;
        self.repository.equipment.scan_lookup(id).await
    }

    /// Operation history of one item, oldest first
    pub async fn history(&self, id: Uuid) -> AppResult<Vec<Operation>> {
        self.repository.equipment.get_by_id(id).await?;
        self.repository.operations.history(id).await
    }
}
