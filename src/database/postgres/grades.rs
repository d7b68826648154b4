use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::{Grade, GradeChanges, NewGrade};
use crate::database::repository::GradeRepository;

const COLUMNS: &str = "id, student_id, discipline_id, teacher_id, value, created_at, updated_at";

#[async_trait]
impl GradeRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Grade>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM grades ORDER BY id");
        Ok(sqlx::query_as::<_, Grade>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Grade>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM grades WHERE id = $1");
        Ok(sqlx::query_as::<_, Grade>(&sql).bind(id).fetch_optional(self.conn()).await?)
    }

    async fn find_by_student_id(&mut self, student_id: i32) -> Result<Vec<Grade>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM grades WHERE student_id = $1 ORDER BY id");
        Ok(sqlx::query_as::<_, Grade>(&sql).bind(student_id).fetch_all(self.conn()).await?)
    }

    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Grade>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM grades WHERE teacher_id = $1 ORDER BY id");
        Ok(sqlx::query_as::<_, Grade>(&sql).bind(teacher_id).fetch_all(self.conn()).await?)
    }

    async fn create(&mut self, grade: NewGrade) -> Result<Grade, DatabaseError> {
        let sql = format!(
            "INSERT INTO grades (student_id, discipline_id, teacher_id, value) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Grade>(&sql)
            .bind(grade.student_id)
            .bind(grade.discipline_id)
            .bind(grade.teacher_id)
            .bind(grade.value)
            .fetch_one(self.conn())
            .await?;
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: GradeChanges) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE grades
            SET student_id = COALESCE($2, student_id),
                discipline_id = COALESCE($3, discipline_id),
                teacher_id = COALESCE($4, teacher_id),
                value = COALESCE($5, value),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.student_id)
        .bind(changes.discipline_id)
        .bind(changes.teacher_id)
        .bind(changes.value)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected())
    }
}
