use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewStudent, Student, StudentChanges};
use crate::database::repository::StudentRepository;

const COLUMNS: &str = "id, first_name, last_name, group_id, user_id, created_at, updated_at";

#[async_trait]
impl StudentRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Student>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM students ORDER BY id");
        Ok(sqlx::query_as::<_, Student>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        Ok(sqlx::query_as::<_, Student>(&sql).bind(id).fetch_optional(self.conn()).await?)
    }

    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE user_id = $1");
        Ok(sqlx::query_as::<_, Student>(&sql).bind(user_id).fetch_optional(self.conn()).await?)
    }

    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Student>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE group_id = $1 ORDER BY id");
        Ok(sqlx::query_as::<_, Student>(&sql).bind(group_id).fetch_all(self.conn()).await?)
    }

    async fn create(&mut self, student: NewStudent) -> Result<Student, DatabaseError> {
        let sql = format!(
            "INSERT INTO students (first_name, last_name, group_id, user_id) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.group_id)
            .bind(student.user_id)
            .fetch_one(self.conn())
            .await?;
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: StudentChanges) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                group_id = COALESCE($4, group_id),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.group_id)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected())
    }
}
