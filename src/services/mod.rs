//! Business operations over the store. Each call runs in its own unit of
//! work; writes commit only when every step succeeded.

pub mod discipline_service;
pub mod grade_service;
pub mod group_discipline_service;
pub mod group_service;
pub mod student_service;
pub mod teacher_service;
pub mod user_service;

pub use discipline_service::DisciplineService;
pub use grade_service::GradeService;
pub use group_discipline_service::GroupDisciplineService;
pub use group_service::GroupService;
pub use student_service::{NewStudentAccount, StudentService};
pub use teacher_service::{NewTeacherAccount, TeacherService};
pub use user_service::{LoginOutcome, UserPatch, UserService};

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation or referenced a missing record.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidData(format!("{} must not be blank", field)));
    }
    Ok(())
}
