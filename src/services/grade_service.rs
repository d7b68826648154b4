use std::sync::Arc;

use tracing::info;

use crate::database::models::grade::{is_valid_grade_value, GRADE_MAX, GRADE_MIN};
use crate::database::models::{Grade, GradeChanges, NewGrade};
use crate::database::{Store, UnitOfWork};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct GradeService {
    store: Arc<dyn Store>,
}

impl GradeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Grade>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.grades().find_all().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Grade>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.grades().find_by_id(id).await?)
    }

    pub async fn get_by_student_id(&self, student_id: i32) -> Result<Vec<Grade>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.grades().find_by_student_id(student_id).await?)
    }

    pub async fn get_by_teacher_id(&self, teacher_id: i32) -> Result<Vec<Grade>, ServiceError> {
        let mut uow = self.store.read().await?;
        Ok(uow.grades().find_by_teacher_id(teacher_id).await?)
    }

    pub async fn create(&self, grade: NewGrade) -> Result<Grade, ServiceError> {
        check_value(grade.value)?;

        let mut uow = self.store.begin().await?;
        check_references(
            uow.as_mut(),
            Some(grade.student_id),
            Some(grade.discipline_id),
            Some(grade.teacher_id),
        )
        .await?;
        let grade = uow.grades().create(grade).await?;
        uow.commit().await?;

        info!("Teacher {} graded student {} with {}", grade.teacher_id, grade.student_id, grade.value);
        Ok(grade)
    }

    pub async fn update(&self, id: i32, changes: GradeChanges) -> Result<Option<Grade>, ServiceError> {
        let mut uow = self.store.begin().await?;
        if uow.grades().find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(value) = changes.value {
            check_value(value)?;
        }
        check_references(uow.as_mut(), changes.student_id, changes.discipline_id, changes.teacher_id).await?;
        uow.grades().update(id, changes).await?;
        let grade = uow.grades().find_by_id(id).await?;
        uow.commit().await?;
        Ok(grade)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut uow = self.store.begin().await?;
        let removed = uow.grades().delete(id).await?;
        uow.commit().await?;
        Ok(removed > 0)
    }
}

fn check_value(value: i32) -> Result<(), ServiceError> {
    if is_valid_grade_value(value) {
        Ok(())
    } else {
        Err(ServiceError::InvalidData(format!(
            "grade value {} outside {}..={}",
            value, GRADE_MIN, GRADE_MAX
        )))
    }
}

async fn check_references(
    uow: &mut dyn UnitOfWork,
    student_id: Option<i32>,
    discipline_id: Option<i32>,
    teacher_id: Option<i32>,
) -> Result<(), ServiceError> {
    if let Some(id) = student_id {
        if uow.students().find_by_id(id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("student {} does not exist", id)));
        }
    }
    if let Some(id) = discipline_id {
        if uow.disciplines().find_by_id(id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("discipline {} does not exist", id)));
        }
    }
    if let Some(id) = teacher_id {
        if uow.teachers().find_by_id(id).await?.is_none() {
            return Err(ServiceError::InvalidData(format!("teacher {} does not exist", id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::services::{
        DisciplineService, GroupService, NewStudentAccount, NewTeacherAccount, StudentService, TeacherService,
    };

    struct Ids {
        student: i32,
        discipline: i32,
        teacher: i32,
    }

    async fn setup() -> (GradeService, Ids) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let teacher = TeacherService::new(store.clone())
            .create(NewTeacherAccount {
                email: "t@example.com".into(),
                password: "secret".into(),
                first_name: "Tom".into(),
                last_name: "T".into(),
            })
            .await
            .unwrap();
        let group = GroupService::new(store.clone()).create("CS-1").await.unwrap();
        let student = StudentService::new(store.clone())
            .create(NewStudentAccount {
                email: "s@example.com".into(),
                password: "secret".into(),
                first_name: "Sam".into(),
                last_name: "S".into(),
                group_id: group.id,
            })
            .await
            .unwrap();
        let discipline = DisciplineService::new(store.clone()).create("Math", teacher.id).await.unwrap();

        let ids = Ids {
            student: student.id,
            discipline: discipline.id,
            teacher: teacher.id,
        };
        (GradeService::new(store), ids)
    }

    fn new_grade(ids: &Ids, value: i32) -> NewGrade {
        NewGrade {
            student_id: ids.student,
            discipline_id: ids.discipline,
            teacher_id: ids.teacher,
            value,
        }
    }

    #[tokio::test]
    async fn create_and_query() {
        let (grades, ids) = setup().await;
        let grade = grades.create(new_grade(&ids, 87)).await.unwrap();
        assert_eq!(grade.value, 87);

        assert_eq!(grades.get_by_student_id(ids.student).await.unwrap().len(), 1);
        assert_eq!(grades.get_by_teacher_id(ids.teacher).await.unwrap().len(), 1);
        assert!(grades.get_by_teacher_id(ids.teacher + 1).await.unwrap().is_empty());
        assert_eq!(grades.get_by_id(grade.id).await.unwrap().map(|g| g.value), Some(87));
    }

    #[tokio::test]
    async fn value_bounds_are_inclusive() {
        let (grades, ids) = setup().await;
        assert!(grades.create(new_grade(&ids, GRADE_MIN)).await.is_ok());
        assert!(grades.create(new_grade(&ids, GRADE_MAX)).await.is_ok());
        assert!(matches!(grades.create(new_grade(&ids, -1)).await, Err(ServiceError::InvalidData(_))));
        assert!(matches!(grades.create(new_grade(&ids, 101)).await, Err(ServiceError::InvalidData(_))));
    }

    #[tokio::test]
    async fn unknown_references_are_invalid() {
        let (grades, ids) = setup().await;
        let mut grade = new_grade(&ids, 50);
        grade.discipline_id = 99;
        assert!(matches!(grades.create(grade).await, Err(ServiceError::InvalidData(_))));
        assert!(grades.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_validates_changed_fields() {
        let (grades, ids) = setup().await;
        let grade = grades.create(new_grade(&ids, 50)).await.unwrap();

        let changes = GradeChanges {
            value: Some(75),
            ..Default::default()
        };
        let updated = grades.update(grade.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.value, 75);

        let changes = GradeChanges {
            value: Some(150),
            ..Default::default()
        };
        assert!(matches!(grades.update(grade.id, changes).await, Err(ServiceError::InvalidData(_))));

        let changes = GradeChanges {
            student_id: Some(99),
            ..Default::default()
        };
        assert!(matches!(grades.update(grade.id, changes).await, Err(ServiceError::InvalidData(_))));
        assert!(grades.update(99, GradeChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_grade_is_none_even_with_bad_value() {
        let (grades, _) = setup().await;
        let changes = GradeChanges {
            value: Some(500),
            ..Default::default()
        };
        assert!(grades.update(999, changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete() {
        let (grades, ids) = setup().await;
        let grade = grades.create(new_grade(&ids, 50)).await.unwrap();
        assert!(grades.delete(grade.id).await.unwrap());
        assert!(!grades.delete(grade.id).await.unwrap());
    }
}
