use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewTeacher, Teacher, TeacherChanges};
use crate::database::repository::TeacherRepository;

const COLUMNS: &str = "id, first_name, last_name, user_id, created_at, updated_at";

#[async_trait]
impl TeacherRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Teacher>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM teachers ORDER BY id");
        Ok(sqlx::query_as::<_, Teacher>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Teacher>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM teachers WHERE id = $1");
        Ok(sqlx::query_as::<_, Teacher>(&sql).bind(id).fetch_optional(self.conn()).await?)
    }

    async fn find_by_user_id(&mut self, user_id: i32) -> Result<Option<Teacher>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM teachers WHERE user_id = $1");
        Ok(sqlx::query_as::<_, Teacher>(&sql).bind(user_id).fetch_optional(self.conn()).await?)
    }

    async fn create(&mut self, teacher: NewTeacher) -> Result<Teacher, DatabaseError> {
        let sql = format!(
            "INSERT INTO teachers (first_name, last_name, user_id) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Teacher>(&sql)
            .bind(&teacher.first_name)
            .bind(&teacher.last_name)
            .bind(teacher.user_id)
            .fetch_one(self.conn())
            .await?;
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: TeacherChanges) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE teachers
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected())
    }
}
