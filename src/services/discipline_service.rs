use std::sync::Arc;

use crate::database::models::{Discipline, DisciplineChanges, NewDiscipline};
use crate::database::Store;
use crate::services::{require_text, ServiceError};

#[derive(Clone)]
pub struct DisciplineService {
    store: Arc<dyn Store>,
}

impl DisciplineService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Discipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.disciplines().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Discipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.disciplines().find_by_id(id).await?)
    }

    /// `None` when the teacher itself does not exist.
    pub async fn get_by_teacher_id(&self, teacher_id: i32) -> Result<Option<Vec<Discipline>>, ServiceError> {
        let mut uow = self.store.read().await?;
        if uow.teachers().find_by_id(teacher_id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(uow.disciplines().find_by_teacher_id(teacher_id).await?))
    }

    pub async fn get_by_group_id(&self, group_id: i32) -> Result<Vec<Discipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.disciplines().find_by_group_id(group_id).await?)
    }

    pub async fn create(&self, name: &str, teacher_id: i32) -> Result<Discipline, ServiceError> {
        require_text("name", name)?;

        let mut uow = self.store.begin().await?;
        if uow.teachers().find_by_id(teacher_id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("teacher {} does not exist", teacher_id)));
        }
        let discipline = uow
            .disciplines()
            .create(NewDiscipline {
                name: name.trim().to_string(),
                teacher_id,
            })
            .await?;
        uow.commit().await?;
        Ok(discipline)
    }

    pub async fn update(&self, id: i32, mut changes: DisciplineChanges) -> Result<Option<Discipline>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.disciplines().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            require_text("name", name)?;
        }
        changes.name = changes.name.map(|name| name.trim().to_string());
        if let Some(teacher_id) = changes.teacher_id {
            if uow.teachers().find_by_id(teacher_id).await?.is_none() {
                return Err(ServiceError::InvalidData(format!("teacher {} does not exist", teacher_id)));
            }
        }
        uow.disciplines().update(id, changes).await?;
        let discipline = uow.disciplines().find_by_id(id).await?;
        uow.commit().await?;
        Ok(discipline)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let removed = uow.disciplines().delete(id).await?;
        uow.commit().await?;
        Ok(removed > 0)
    }
}
