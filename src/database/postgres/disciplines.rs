use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::{Discipline, DisciplineChanges, NewDiscipline};
use crate::database::repository::DisciplineRepository;

const COLUMNS: &str = "id, name, teacher_id, created_at, updated_at";

#[async_trait]
impl DisciplineRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Discipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM disciplines ORDER BY id");
        Ok(sqlx::query_as::<_, Discipline>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Discipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM disciplines WHERE id = $1");
        Ok(sqlx::query_as::<_, Discipline>(&sql).bind(id).fetch_optional(self.conn()).await?)
    }

    async fn find_by_teacher_id(&mut self, teacher_id: i32) -> Result<Vec<Discipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM disciplines WHERE teacher_id = $1 ORDER BY id");
        Ok(sqlx::query_as::<_, Discipline>(&sql).bind(teacher_id).fetch_all(self.conn()).await?)
    }

    async fn find_by_group_id(&mut self, group_id: i32) -> Result<Vec<Discipline>, DatabaseError> {
        let rows = sqlx::query_as::<_, Discipline>(
            r#"
            SELECT d.id, d.name, d.teacher_id, d.created_at, d.updated_at
            FROM disciplines d
            JOIN group_disciplines gd ON gd.discipline_id = d.id
            WHERE gd.group_id = $1
            ORDER BY d.id
            "#,
        )
        .bind(group_id)
        .fetch_all(self.conn())
        .await?;
        Ok(rows)
    }

    async fn create(&mut self, discipline: NewDiscipline) -> Result<Discipline, DatabaseError> {
        let sql = format!("INSERT INTO disciplines (name, teacher_id) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, Discipline>(&sql)
            .bind(&discipline.name)
            .bind(discipline.teacher_id)
            .fetch_one(self.conn())
            .await?;
        Ok(row)
    }

    async fn update(&mut self, id: i32, changes: DisciplineChanges) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE disciplines
            SET name = COALESCE($2, name),
                teacher_id = COALESCE($3, teacher_id),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.teacher_id)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM disciplines WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected())
    }
}
