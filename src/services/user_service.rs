use std::sync::Arc;

use tracing::info;

use crate::auth;
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::{Store, UnitOfWork};
use crate::services::{require_text, ServiceError};
use crate::types::Role;

/// Requested changes to a user account; `password` is plain text and is
/// hashed before it reaches the store.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.role.is_none()
    }
}

#[derive(Debug)]
pub enum LoginOutcome {
    UnknownEmail,
    WrongPassword,
    Authenticated(User),
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.users().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.users().find_by_id(id).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.users().find_by_email(email).await?)
    }

    pub async fn create(&self, email: &str, password: &str, role: Role) -> Result<User, ServiceError> {
        validate_email(email)?;
        require_text("password", password)?;
        let password_hash = auth::hash_password(password).await?;

        let mut uow = self.store.begin().await?;
        let user = insert_account(uow.as_mut(), email, password_hash, role).await?;
        uow.commit().await?;

        info!("Created user {} with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: i32, patch: UserPatch) -> Result<Option<User>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.users().find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let password_hash = match &patch.password {
            Some(password) => {
                require_text("password", password)?;
                Some(auth::hash_password(password).await?)
            }
            None => None,
        };
        if let Some(email) = &patch.email {
            validate_email(email)?;
            if let Some(other) = uow.users().find_by_email(email).await? {
                if other.id != id {
                    return Err(ServiceError::InvalidData(format!("email {} is already registered", email)));
                }
            }
        }

        let changes = UserChanges {
            email: patch.email,
            password_hash,
            role: patch.role,
        };
        uow.users().update(id, changes).await?;
        let user = uow.users().find_by_id(id).await?;
        uow.commit().await?;
        Ok(user)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let removed = uow.users().delete(id).await?;
        uow.commit().await?;
        Ok(removed > 0)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ServiceError> {
        let Some(user) = self.get_by_email(email).await? else {
            return Ok(LoginOutcome::UnknownEmail);
        };
        if !auth::verify_password(password, &user.password_hash).await? {
            return Ok(LoginOutcome::WrongPassword);
        }
        Ok(LoginOutcome::Authenticated(user))
    }
}

/// Insert a user inside the caller's unit of work, rejecting taken emails.
pub(crate) async fn insert_account(
    uow: &mut dyn UnitOfWork,
    email: &str,
    password_hash: String,
    role: Role,
) -> Result<User, ServiceError> {
    if uow.users().find_by_email(email).await?.is_some() {
        return Err(ServiceError::InvalidData(format!("email {} is already registered", email)));
    }

    let user = uow
        .users()
        .create(NewUser {
            email: email.to_string(),
            password_hash,
            role,
        })
        .await?;
    Ok(user)
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub(crate) fn validate_email(email: &str) -> Result<(), ServiceError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ServiceError::InvalidData(format!("malformed email: {}", email)))
    }
}
