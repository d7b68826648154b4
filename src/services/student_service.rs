use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::database::models::{NewStudent, Student, StudentChanges};
use crate::database::Store;
use crate::services::user_service::{insert_account, validate_email};
use crate::services::{require_text, ServiceError};
use crate::types::Role;

/// Enrollment data for a student and the account it logs in with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: i32,
}

#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn Store>,
}

impl StudentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Student>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.students().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Student>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.students().find_by_id(id).await?)
    }

    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Option<Student>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.students().find_by_user_id(user_id).await?)
    }

    pub async fn get_by_group_id(&self, group_id: i32) -> Result<Vec<Student>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.students().find_by_group_id(group_id).await?)
    }

    /// Create the `student` account and the student row together.
    pub async fn create(&self, account: NewStudentAccount) -> Result<Student, ServiceError> {
        validate_email(&account.email)?;
        require_text("password", &account.password)?;
        require_text("firstName", &account.first_name)?;
        require_text("lastName", &account.last_name)?;
        let password_hash = auth::hash_password(&account.password).await?;

        let mut uow = self.store.begin().await?;
        if uow.groups().find_by_id(account.group_id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("group {} does not exist", account.group_id)));
        }
        let user = insert_account(uow.as_mut(), &account.email, password_hash, Role::Student).await?;
        let student = uow
            .students()
            .create(NewStudent {
                first_name: account.first_name,
                last_name: account.last_name,
                group_id: account.group_id,
                user_id: user.id,
            })
            .await?;
        uow.commit().await?;

        info!("Created student {} in group {}", student.id, student.group_id);
        Ok(student)
    }

    pub async fn update(&self, id: i32, changes: StudentChanges) -> Result<Option<Student>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.students().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(first_name) = &changes.first_name {
            require_text("firstName", first_name)?;
        }
        if let Some(last_name) = &changes.last_name {
            require_text("lastName", last_name)?;
        }
        if let Some(group_id) = changes.group_id {
            if uow.groups().find_by_id(group_id).await?.is_none() {
                return Err(ServiceError::InvalidData(format!("group {} does not exist", group_id)));
            }
        }
        uow.students().update(id, changes).await?;
        let student = uow.students().find_by_id(id).await?;
        uow.commit().await?;
        Ok(student)
    }

    /// Remove the student and its user account together.
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let Some(student) = uow.students().find_by_id(id).await? else {
            return Ok(false);
        };
        uow.students().delete(id).await?;
        uow.users().delete(student.user_id).await?;
        uow.commit().await?;

        info!("Deleted student {} and user {}", id, student.user_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::services::{GroupService, UserService};

    struct Fixture {
        students: StudentService,
        groups: GroupService,
        users: UserService,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Fixture {
            students: StudentService::new(store.clone()),
            groups: GroupService::new(store.clone()),
            users: UserService::new(store),
        }
    }

    fn account(email: &str, group_id: i32) -> NewStudentAccount {
        NewStudentAccount {
            email: email.to_string(),
            password: "secret".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Doe".to_string(),
            group_id,
        }
    }

    #[tokio::test]
    async fn create_makes_student_account() {
        let f = fixture();
        let group = f.groups.create("CS-1").await.unwrap();
        let student = f.students.create(account("sam@example.com", group.id)).await.unwrap();

        let user = f.users.get_by_id(student.user_id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(f.students.get_by_group_id(group.id).await.unwrap().len(), 1);
        assert_eq!(f.students.get_by_user_id(user.id).await.unwrap().map(|s| s.id), Some(student.id));
    }

    #[tokio::test]
    async fn unknown_group_creates_nothing() {
        let f = fixture();
        let err = f.students.create(account("sam@example.com", 42)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidData(_)));
        assert!(f.users.get_all().await.unwrap().is_empty());
        assert!(f.students.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_invalid() {
        let f = fixture();
        let group = f.groups.create("CS-1").await.unwrap();
        f.students.create(account("sam@example.com", group.id)).await.unwrap();
        let err = f.students.create(account("sam@example.com", group.id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidData(_)));
    }

    #[tokio::test]
    async fn update_moves_student_between_groups() {
        let f = fixture();
        let first = f.groups.create("CS-1").await.unwrap();
        let second = f.groups.create("CS-2").await.unwrap();
        let student = f.students.create(account("sam@example.com", first.id)).await.unwrap();

        let changes = StudentChanges {
            group_id: Some(second.id),
            ..Default::default()
        };
        let updated = f.students.update(student.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.group_id, second.id);
        assert!(f.students.get_by_group_id(first.id).await.unwrap().is_empty());

        let changes = StudentChanges {
            group_id: Some(99),
            ..Default::default()
        };
        assert!(matches!(
            f.students.update(student.id, changes).await,
            Err(ServiceError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_student_and_user() {
        let f = fixture();
        let group = f.groups.create("CS-1").await.unwrap();
        let student = f.students.create(account("sam@example.com", group.id)).await.unwrap();

        assert!(f.students.delete(student.id).await.unwrap());
        assert!(f.users.get_by_id(student.user_id).await.unwrap().is_none());
        assert!(!f.students.delete(student.id).await.unwrap());
        assert!(f.students.update(student.id, StudentChanges::default()).await.unwrap().is_none());
    }
}
