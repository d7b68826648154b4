//! In-process store selected with `DATABASE_URL=memory:`.
//!
//! Mirrors the constraints declared in `migrations/`: unique user emails,
//! foreign keys (restricting deletes of referenced rows, cascading
//! `group_disciplines`), grade value bounds and serial ids.
//!
//! A transactional unit of work holds the writer lock for its whole
//! lifetime and works on a private copy of the tables, which replaces the
//! shared copy on commit. Transactions are therefore serialized.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use crate::database::manager::DatabaseError;
use crate::database::models::grade::is_valid_grade_value;
use crate::database::models::*;
use crate::database::repository::*;
use crate::database::unit_of_work::{Store, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    teachers: BTreeMap<i32, Teacher>,
    students: BTreeMap<i32, Student>,
    groups: BTreeMap<i32, Group>,
    disciplines: BTreeMap<i32, Discipline>,
    grades: BTreeMap<i32, Grade>,
    links: BTreeMap<(i32, i32), GroupDiscipline>,
    sequences: Sequences,
}

/// Next value of each table's serial id.
#[derive(Debug, Clone, Default)]
struct Sequences {
    users: i32,
    teachers: i32,
    students: i32,
    groups: i32,
    disciplines: i32,
    grades: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn conflict(message: impl Into<String>) -> DatabaseError {
    DatabaseError::Conflict(message.into())
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    writer: Arc<tokio::sync::Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<Tables, DatabaseError> {
        Ok(lock(&self.tables)?.clone())
    }
}

fn lock(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
    tables
        .lock()
        .map_err(|_| DatabaseError::Unavailable("memory store poisoned by a panicked writer"))
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError> {
        let guard = self.writer.clone().lock_owned().await;
        let working = self.snapshot()?;
        Ok(Box::new(MemoryUnitOfWork {
            shared: self.tables.clone(),
            working,
            writer: Some(guard),
        }))
    }

    async fn read(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError> {
        Ok(Box::new(MemoryUnitOfWork {
            shared: self.tables.clone(),
            working: self.snapshot()?,
            writer: None,
        }))
    }

    async fn migrate(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        lock(&self.tables).map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

pub struct MemoryUnitOfWork {
    shared: Arc<Mutex<Tables>>,
    working: Tables,
    /// Present for transactional units of work only.
    writer: Option<OwnedMutexGuard<()>>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn teachers(&mut self) -> &mut dyn TeacherRepository {
        self
    }

    fn students(&mut self) -> &mut dyn StudentRepository {
        self
    }

    fn groups(&mut self) -> &mut dyn GroupRepository {
        self
    }

    fn disciplines(&mut self) -> &mut dyn DisciplineRepository {
        self
    }

    fn grades(&mut self) -> &mut dyn GradeRepository {
        self
    }

    fn group_disciplines(&mut self) -> &mut dyn GroupDisciplineRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let this = *self;
        if this.writer.is_some() {
            *lock(&this.shared)? = this.working;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.working.users.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.working.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&mut self, user: NewUser) -> Result<User, DatabaseError> {
        let t = &mut self.working;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(conflict(format!("duplicate email {}", user.email)));
        }
        let now = Utc::now();
        let row = User {
            id: next(&mut t.sequences.users),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: UserChanges) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if let Some(email) = &changes.email {
            if t.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(conflict(format!("duplicate email {}", email)));
            }
        }
        let Some(row) = t.users.get_mut(&id) else { return Ok(0) };
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(hash) = changes.password_hash {
            row.password_hash = hash;
        }
        if let Some(role) = changes.role {
            row.role = role;
        }
        row.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if t.teachers.values().any(|r| r.user_id == id) || t.students.values().any(|r| r.user_id == id) {
            return Err(conflict(format!("user {} is still referenced", id)));
        }
        Ok(t.users.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl TeacherRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Teacher>, DatabaseError> {
        Ok(self.working.teachers.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Teacher>, DatabaseError> {
        Ok(self.working.teachers.get(&id).cloned())
    }

    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Teacher>, DatabaseError> {
        Ok(self.working.teachers.values().find(|r| r.user_id == user_id).cloned())
    }

    async fn create(&mut self, teacher: NewTeacher) -> Result<Teacher, DatabaseError> {
        let t = &mut self.working;
        if !t.users.contains_key(&teacher.user_id) {
            return Err(conflict(format!("user {} does not exist", teacher.user_id)));
        }
        let now = Utc::now();
        let row = Teacher {
            id: next(&mut t.sequences.teachers),
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            user_id: teacher.user_id,
            created_at: now,
            updated_at: now,
        };
        t.teachers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: TeacherChanges) -> Result<u64, DatabaseError> {
        let Some(row) = self.working.teachers.get_mut(&id) else { return Ok(0) };
        if let Some(first_name) = changes.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = last_name;
        }
        row.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if t.disciplines.values().any(|r| r.teacher_id == id) || t.grades.values().any(|r| r.teacher_id == id) {
            return Err(conflict(format!("teacher {} is still referenced", id)));
        }
        Ok(t.teachers.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl StudentRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Student>, DatabaseError> {
        Ok(self.working.students.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Student>, DatabaseError> {
        Ok(self.working.students.get(&id).cloned())
    }

    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Student>, DatabaseError> {
        Ok(self.working.students.values().find(|r| r.user_id == user_id).cloned())
    }

    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Student>, DatabaseError> {
        Ok(self.working.students.values().filter(|r| r.group_id == group_id).cloned().collect())
    }

    async fn create(&mut self, student: NewStudent) -> Result<Student, DatabaseError> {
        let t = &mut self.working;
        if !t.users.contains_key(&student.user_id) {
            return Err(conflict(format!("user {} does not exist", student.user_id)));
        }
        if !t.groups.contains_key(&student.group_id) {
            return Err(conflict(format!("group {} does not exist", student.group_id)));
        }
        let now = Utc::now();
        let row = Student {
            id: next(&mut t.sequences.students),
            first_name: student.first_name,
            last_name: student.last_name,
            group_id: student.group_id,
            user_id: student.user_id,
            created_at: now,
            updated_at: now,
        };
        t.students.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: StudentChanges) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if let Some(group_id) = changes.group_id {
            if !t.groups.contains_key(&group_id) {
                return Err(conflict(format!("group {} does not exist", group_id)));
            }
        }
        let Some(row) = t.students.get_mut(&id) else { return Ok(0) };
        if let Some(first_name) = changes.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = last_name;
        }
        if let Some(group_id) = changes.group_id {
            row.group_id = group_id;
        }
        row.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if t.grades.values().any(|r| r.student_id == id) {
            return Err(conflict(format!("student {} is still referenced", id)));
        }
        Ok(t.students.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl GroupRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Group>, DatabaseError> {
        Ok(self.working.groups.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Group>, DatabaseError> {
        Ok(self.working.groups.get(&id).cloned())
    }

    async fn create(&mut self, name: &str) -> Result<Group, DatabaseError> {
        let t = &mut self.working;
        let now = Utc::now();
        let row = Group {
            id: next(&mut t.sequences.groups),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.groups.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: GroupChanges) -> Result<u64, DatabaseError> {
        let Some(row) = self.working.groups.get_mut(&id) else { return Ok(0) };
        if let Some(name) = changes.name {
            row.name = name;
        }
        row.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if t.students.values().any(|r| r.group_id == id) {
            return Err(conflict(format!("group {} is still referenced", id)));
        }
        let removed = t.groups.remove(&id).map_or(0, |_| 1);
        if removed > 0 {
            t.links.retain(|(group_id, _), _| *group_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl DisciplineRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Discipline>, DatabaseError> {
        Ok(self.working.disciplines.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Discipline>, DatabaseError> {
        Ok(self.working.disciplines.get(&id).cloned())
    }

    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Discipline>, DatabaseError> {
        Ok(self
            .working
            .disciplines
            .values()
            .filter(|r| r.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Discipline>, DatabaseError> {
        let t = &self.working;
        let mut rows: Vec<Discipline> = t
            .links
            .keys()
            .filter(|(g, _)| *g == group_id)
            .filter_map(|(_, d)| t.disciplines.get(d).cloned())
            .collect();
        rows.sort_by_key(|d| d.id);
        Ok(rows)
    }

    async fn create(&mut self, discipline: NewDiscipline) -> Result<Discipline, DatabaseError> {
        let t = &mut self.working;
        if !t.teachers.contains_key(&discipline.teacher_id) {
            return Err(conflict(format!("teacher {} does not exist", discipline.teacher_id)));
        }
        let now = Utc::now();
        let row = Discipline {
            id: next(&mut t.sequences.disciplines),
            name: discipline.name,
            teacher_id: discipline.teacher_id,
            created_at: now,
            updated_at: now,
        };
        t.disciplines.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: DisciplineChanges) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if let Some(teacher_id) = changes.teacher_id {
            if !t.teachers.contains_key(&teacher_id) {
                return Err(conflict(format!("teacher {} does not exist", teacher_id)));
            }
        }
        let Some(row) = t.disciplines.get_mut(&id) else { return Ok(0) };
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(teacher_id) = changes.teacher_id {
            row.teacher_id = teacher_id;
        }
        row.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let t = &mut self.working;
        if t.grades.values().any(|r| r.discipline_id == id) {
            return Err(conflict(format!("discipline {} is still referenced", id)));
        }
        let removed = t.disciplines.remove(&id).map_or(0, |_| 1);
        if removed > 0 {
            t.links.retain(|(_, discipline_id), _| *discipline_id != id);
        }
        Ok(removed)
    }
}

impl MemoryUnitOfWork {
    fn check_grade_refs(&self, student_id: i32, discipline_id: i32, teacher_id: i32) -> Result<(), DatabaseError> {
        let t = &self.working;
        if !t.students.contains_key(&student_id) {
            return Err(conflict(format!("student {} does not exist", student_id)));
        }
        if !t.disciplines.contains_key(&discipline_id) {
            return Err(conflict(format!("discipline {} does not exist", discipline_id)));
        }
        if !t.teachers.contains_key(&teacher_id) {
            return Err(conflict(format!("teacher {} does not exist", teacher_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl GradeRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Grade>, DatabaseError> {
        Ok(self.working.grades.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Grade>, DatabaseError> {
        Ok(self.working.grades.get(&id).cloned())
    }

    async fn find_by_student_id(&mut self, student_id: i32) -> Result<Vec<Grade>, DatabaseError> {
        Ok(self.working.grades.values().filter(|r| r.student_id == student_id).cloned().collect())
    }

    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Grade>, DatabaseError> {
        Ok(self.working.grades.values().filter(|r| r.teacher_id == teacher_id).cloned().collect())
    }

    async fn create(&mut self, grade: NewGrade) -> Result<Grade, DatabaseError> {
        if !is_valid_grade_value(grade.value) {
            return Err(conflict(format!("grade value {} out of range", grade.value)));
        }
        self.check_grade_refs(grade.student_id, grade.discipline_id, grade.teacher_id)?;
        let t = &mut self.working;
        let now = Utc::now();
        let row = Grade {
            id: next(&mut t.sequences.grades),
            student_id: grade.student_id,
            discipline_id: grade.discipline_id,
            teacher_id: grade.teacher_id,
            value: grade.value,
            created_at: now,
            updated_at: now,
        };
        t.grades.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: GradeChanges) -> Result<u64, DatabaseError> {
        let Some(current) = self.working.grades.get(&id).cloned() else { return Ok(0) };
        let value = changes.value.unwrap_or(current.value);
        if !is_valid_grade_value(value) {
            return Err(conflict(format!("grade value {} out of range", value)));
        }
        let student_id = changes.student_id.unwrap_or(current.student_id);
        let discipline_id = changes.discipline_id.unwrap_or(current.discipline_id);
        let teacher_id = changes.teacher_id.unwrap_or(current.teacher_id);
        self.check_grade_refs(student_id, discipline_id, teacher_id)?;

        let row = Grade {
            student_id,
            discipline_id,
            teacher_id,
            value,
            updated_at: Utc::now(),
            ..current
        };
        self.working.grades.insert(id, row);
        Ok(1)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        Ok(self.working.grades.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl GroupDisciplineRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        Ok(self.working.links.values().cloned().collect())
    }

    async fn find_all_by_group_id(&mut self, group_id: i32) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        Ok(self.working.links.values().filter(|l| l.group_id == group_id).cloned().collect())
    }

    async fn find_all_by_discipline_id(
        &mut self,
        discipline_id: i32,
    ) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        Ok(self
            .working
            .links
            .values()
            .filter(|l| l.discipline_id == discipline_id)
            .cloned()
            .collect())
    }

    async fn create(&mut self, group_id: i32, discipline_id: i32) -> Result<GroupDiscipline, DatabaseError> {
        let t = &mut self.working;
        if !t.groups.contains_key(&group_id) {
            return Err(conflict(format!("group {} does not exist", group_id)));
        }
        if !t.disciplines.contains_key(&discipline_id) {
            return Err(conflict(format!("discipline {} does not exist", discipline_id)));
        }
        if t.links.contains_key(&(group_id, discipline_id)) {
            return Err(conflict(format!(
                "group {} is already linked to discipline {}",
                group_id, discipline_id
            )));
        }
        let now = Utc::now();
        let row = GroupDiscipline {
            group_id,
            discipline_id,
            created_at: now,
            updated_at: now,
        };
        t.links.insert((group_id, discipline_id), row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Guest,
        }
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.users().create(new_user("a@example.com")).await.unwrap();
        uow.commit().await.unwrap();

        let mut read = store.read().await.unwrap();
        let found = read.users().find_by_id(user.id).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("a@example.com".to_string()));
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            let user = uow.users().create(new_user("a@example.com")).await.unwrap();
            uow.teachers()
                .create(NewTeacher { first_name: "Ada".into(), last_name: "L".into(), user_id: user.id })
                .await
                .unwrap();
        }

        let mut read = store.read().await.unwrap();
        assert!(read.users().find_all().await.unwrap().is_empty());
        assert!(read.teachers().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn explicit_rollback_discards_writes() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.groups().create("CS-101").await.unwrap();
        uow.rollback().await.unwrap();

        let mut read = store.read().await.unwrap();
        assert!(read.groups().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.users().create(new_user("a@example.com")).await.unwrap();
        let err = uow.users().create(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn restricts_delete_of_referenced_rows() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let group = uow.groups().create("G1").await.unwrap();
        let user = uow.users().create(new_user("s@example.com")).await.unwrap();
        uow.students()
            .create(NewStudent {
                first_name: "S".into(),
                last_name: "T".into(),
                group_id: group.id,
                user_id: user.id,
            })
            .await
            .unwrap();

        assert!(matches!(uow.groups().delete(group.id).await, Err(DatabaseError::Conflict(_))));
        assert!(matches!(uow.users().delete(user.id).await, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn deleting_a_group_drops_its_links() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.users().create(new_user("t@example.com")).await.unwrap();
        let teacher = uow
            .teachers()
            .create(NewTeacher { first_name: "T".into(), last_name: "T".into(), user_id: user.id })
            .await
            .unwrap();
        let group = uow.groups().create("G1").await.unwrap();
        let discipline = uow
            .disciplines()
            .create(NewDiscipline { name: "Math".into(), teacher_id: teacher.id })
            .await
            .unwrap();
        uow.group_disciplines().create(group.id, discipline.id).await.unwrap();

        assert_eq!(uow.groups().delete(group.id).await.unwrap(), 1);
        assert!(uow.group_disciplines().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let first = uow.groups().create("A").await.unwrap();
        uow.groups().delete(first.id).await.unwrap();
        let second = uow.groups().create("B").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn update_of_missing_row_reports_zero() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let changes = GroupChanges { name: Some("x".into()) };
        assert_eq!(uow.groups().update(42, changes).await.unwrap(), 0);
        assert_eq!(uow.grades().delete(42).await.unwrap(), 0);
    }
}
