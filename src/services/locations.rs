//! Locations service: sibling-unique names and an acyclic parent tree

use crate::{
    error::{AppError, AppResult},
    models::location::{CreateLocation, Location, UpdateLocation},
    repository::Repository,
};

#[derive(Clone)]
pub struct LocationsService {
    repository: Repository,
}

impl LocationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Location>> {
        self.repository.locations.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Location> {
        self.repository.locations.get_by_id(id).await
    }

    pub async fn children(&self, id: i32) -> AppResult<Vec<Location>> {
        self.repository.locations.get_by_id(id).await?;
        self.repository.locations.children(id).await
    }

    pub async fn create(&self, data: &CreateLocation) -> AppResult<Location> {
        if let Some(parent_id) = data.parent_id {
            self.repository.locations.get_by_id(parent_id).await?;
        }
        self.ensure_unique_name(&data.name, data.parent_id, None).await?;
        self.repository.locations.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateLocation) -> AppResult<Location> {
        let current = self.repository.locations.get_by_id(id).await?;

        let name = data.name.as_deref().unwrap_or(&current.name);
        let parent_id = data.parent_id.unwrap_or(current.parent_id);
        let description = data.description.as_deref().unwrap_or(&current.description);

        if let Some(new_parent) = parent_id.filter(|p| Some(*p) != current.parent_id) {
            self.repository.locations.get_by_id(new_parent).await?;
            if self.repository.locations.is_in_subtree(id, new_parent).await? {
                return Err(AppError::Validation(
                    "parent_id: a location cannot be placed inside itself or its descendants"
                        .to_string(),
                ));
            }
        }

        if name != current.name || parent_id != current.parent_id {
            self.ensure_unique_name(name, parent_id, Some(id)).await?;
        }

        self.repository
            .locations
            .update(id, name, parent_id, description)
            .await
    }

    /// Delete a location; children become roots and equipment loses the reference.
    ///
    /// Rejected when a child would land at root level next to a root of the same name.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.locations.delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "Location {} has a child named like an existing root location; rename it first",
                id
            )),
            other => other,
        })?;
        tracing::info!("Location {} deleted", id);
        Ok(())
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        parent_id: Option<i32>,
        exclude_id: Option<i32>,
    ) -> AppResult<()> {
        if self
            .repository
            .locations
            .sibling_name_taken(name, parent_id, exclude_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "A location named {} already exists under the same parent",
                name
            )));
        }
        Ok(())
    }
}
