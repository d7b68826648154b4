use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::database::models::{NewTeacher, Teacher, TeacherChanges};
use crate::database::Store;
use crate::services::user_service::{insert_account, validate_email};
use crate::services::{require_text, ServiceError};
use crate::types::Role;

/// Sign-up data for a teacher and the account it logs in with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacherAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone)]
pub struct TeacherService {
    store: Arc<dyn Store>,
}

impl TeacherService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Teacher>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.teachers().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Teacher>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.teachers().find_by_id(id).await?)
    }

    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Option<Teacher>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.teachers().find_by_user_id(user_id).await?)
    }

    /// Create the `teacher` account and the teacher row together.
    pub async fn create(&self, account: NewTeacherAccount) -> Result<Teacher, ServiceError> {
        validate_email(&account.email)?;
        require_text("password", &account.password)?;
        require_text("firstName", &account.first_name)?;
        require_text("lastName", &account.last_name)?;
        let password_hash = auth::hash_password(&account.password).await?;

        let mut uow = self.store.begin().await?;
        let user = insert_account(uow.as_mut(), &account.email, password_hash, Role::Teacher).await?;
        let teacher = uow
            .teachers()
            .create(NewTeacher {
                first_name: account.first_name,
                last_name: account.last_name,
                user_id: user.id,
            })
            .await?;
        uow.commit().await?;

        info!("Created teacher {} for user {}", teacher.id, user.id);
        Ok(teacher)
    }

    pub async fn update(&self, id: i32, changes: TeacherChanges) -> Result<Option<Teacher>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.teachers().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(first_name) = &changes.first_name {
            require_text("firstName", first_name)?;
        }
        if let Some(last_name) = &changes.last_name {
            require_text("lastName", last_name)?;
        }

        uow.teachers().update(id, changes).await?;
        let teacher = uow.teachers().find_by_id(id).await?;
        uow.commit().await?;
        Ok(teacher)
    }

    /// Remove the teacher and its user account together.
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let Some(teacher) = uow.teachers().find_by_id(id).await? else {
            return Ok(false);
        };
        uow.teachers().delete(id).await?;
        uow.users().delete(teacher.user_id).await?;
        uow.commit().await?;

        info!("Deleted teacher {} and user {}", id, teacher.user_id);
        Ok(true)
    }
}
