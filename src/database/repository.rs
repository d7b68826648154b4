//! Repository contracts, one per table.
//!
//! Every method takes `&mut self` because implementations run on the
//! connection or transaction owned by the enclosing unit of work.
//! `update` and `delete` report affected row counts; zero means no row
//! matched the id.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::*;

#[async_trait]
pub trait UserRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<User>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<User>, DatabaseError>;
    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn create(&mut self, user: NewUser) -> Result<User, DatabaseError>;
    async fn update(&mut self, id: i32, changes: UserChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait TeacherRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<Teacher>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<Teacher>, DatabaseError>;
    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Teacher>, DatabaseError>;
    async fn create(&mut self, teacher: NewTeacher) -> Result<Teacher, DatabaseError>;
    async fn update(&mut self, id: i32, changes: TeacherChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait StudentRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<Student>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<Student>, DatabaseError>;
    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Student>, DatabaseError>;
    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Student>, DatabaseError>;
    async fn create(&mut self, student: NewStudent) -> Result<Student, DatabaseError>;
    async fn update(&mut self, id: i32, changes: StudentChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait GroupRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<Group>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<Group>, DatabaseError>;
    async fn create(&mut self, name: &str) -> Result<Group, DatabaseError>;
    async fn update(&mut self, id: i32, changes: GroupChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait DisciplineRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<Discipline>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<Discipline>, DatabaseError>;
    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Discipline>, DatabaseError>;
    /// Disciplines linked to the group through `group_disciplines`.
    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Discipline>, DatabaseError>;
    async fn create(&mut self, discipline: NewDiscipline) -> Result<Discipline, DatabaseError>;
    async fn update(&mut self, id: i32, changes: DisciplineChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait GradeRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<Grade>, DatabaseError>;
    async fn find_by_id(&mut self, id: i32) -> Result<Option<Grade>, DatabaseError>;
    async fn find_by_student_id(&mut self, student_id: i32) -> Result<Vec<Grade>, DatabaseError>;
    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Grade>, DatabaseError>;
    async fn create(&mut self, grade: NewGrade) -> Result<Grade, DatabaseError>;
    async fn update(&mut self, id: i32, changes: GradeChanges) -> Result<u64, DatabaseError>;
    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait GroupDisciplineRepository: Send {
    async fn find_all(&mut self) -> Result<Vec<GroupDiscipline>, DatabaseError>;
    async fn find_all_by_group_id(&mut self, group_id: i32) -> Result<Vec<GroupDiscipline>, DatabaseError>;
    async fn find_all_by_discipline_id(
        &mut self,
        discipline_id: i32,
    ) -> Result<Vec<GroupDiscipline>, DatabaseError>;
    async fn create(&mut self, group_id: i32, discipline_id: i32) -> Result<GroupDiscipline, DatabaseError>;
}
