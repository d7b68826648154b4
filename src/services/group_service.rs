use std::sync::Arc;

use crate::database::models::{Group, GroupChanges};
use crate::database::Store;
use crate::services::{require_text, ServiceError};

#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn Store>,
}

impl GroupService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Group>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.groups().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Group>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.groups().find_by_id(id).await?)
    }

    pub async fn create(&self, name: &str) -> Result<Group, ServiceError> {
        require_text("name", name)?;

        let mut uow = self.store.begin().await?;
        let group = uow.groups().create(name.trim()).await?;
        uow.commit().await?;
        Ok(group)
    }

    pub async fn update(&self, id: i32, name: &str) -> Result<Option<Group>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.groups().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        require_text("name", name)?;

        let changes = GroupChanges {
            name: Some(name.trim().to_string()),
        };
        uow.groups().update(id, changes).await?;
        let group = uow.groups().find_by_id(id).await?;
        uow.commit().await?;
        Ok(group)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let removed = uow.groups().delete(id).await?;
        uow.commit().await?;
        Ok(removed > 0)
    }
}
