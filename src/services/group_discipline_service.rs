use std::sync::Arc;

use tracing::info;

use crate::database::models::GroupDiscipline;
use crate::database::Store;
use crate::services::ServiceError;

#[derive(Clone)]
pub struct GroupDisciplineService {
    store: Arc<dyn Store>,
}

impl GroupDisciplineService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<GroupDiscipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.group_disciplines().find_all().await?)
    }

    pub async fn get_by_group_id(&self, group_id: i32) -> Result<Vec<GroupDiscipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.group_disciplines().find_all_by_group_id(group_id).await?)
    }

    pub async fn get_by_discipline_id(&self, discipline_id: i32) -> Result<Vec<GroupDiscipline>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.group_disciplines().find_all_by_discipline_id(discipline_id).await?)
    }

    /// Put a discipline on a group's curriculum.
    pub async fn link(&self, group_id: i32, discipline_id: i32) -> Result<GroupDiscipline, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.groups().find_by_id(group_id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("group {} does not exist", group_id)));
        }
        if uow.disciplines().find_by_id(discipline_id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("discipline {} does not exist", discipline_id)));
        }
        let existing = uow.group_disciplines().find_all_by_group_id(group_id).await?;
        if existing.iter().any(|link| link.discipline_id == discipline_id) {
            return Err(ServiceError::Conflict(format!(
                "Group {} is already linked to discipline {}",
                group_id, discipline_id
            )));
        }

        let link = uow.group_disciplines().create(group_id, discipline_id).await?;
        uow.commit().await?;

        info!("Linked group {} to discipline {}", group_id, discipline_id);
        Ok(link)
    }
}
