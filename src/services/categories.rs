//! Equipment categories service

use crate::{
    error::AppResult,
    models::category::{CreateCategory, EquipmentCategory, UpdateCategory},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentCategory>> {
        self.repository.categories.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentCategory> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateCategory) -> AppResult<EquipmentCategory> {
        self.repository.categories.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<EquipmentCategory> {
        self.repository.categories.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await
    }
}
