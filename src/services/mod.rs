//! Business logic services

pub mod categories;
pub mod equipment;
pub mod inventory;
pub mod locations;
pub mod notifications;
pub mod operations;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub categories: categories::CategoriesService,
    pub locations: locations::LocationsService,
    pub equipment: equipment::EquipmentService,
    pub operations: operations::OperationsService,
    pub inventory: inventory::InventoryService,
    pub notifications: notifications::NotificationsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            categories: categories::CategoriesService::new(repository.clone()),
            locations: locations::LocationsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            operations: operations::OperationsService::new(repository.clone()),
            inventory: inventory::InventoryService::new(repository.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            repository,
        }
    }

    /// Check the database is reachable
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
