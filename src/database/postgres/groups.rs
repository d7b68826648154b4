use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::{Group, GroupChanges};
use crate::database::repository::GroupRepository;

const COLUMNS: &str = "id, name, created_at, updated_at";

#[async_trait]
impl GroupRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Group>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM groups ORDER BY id");
        Ok(sqlx::query_as::<_, Group>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_by_id(&mut self, id: i32) -> Result<Option<Group>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        Ok(sqlx::query_as::<_, Group>(&sql).bind(id).fetch_optional(self.conn()).await?)
    }

    async fn create(&mut self, name: &str) -> Result<Group, DatabaseError> {
        let sql = format!("INSERT INTO groups (name) VALUES ($1) RETURNING {COLUMNS}");
        Ok(sqlx::query_as::<_, Group>(&sql).bind(name).fetch_one(self.conn()).await?)
    }

    async fn update(&mut self, id: i32, changes: GroupChanges) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE groups SET name = COALESCE($2, name), updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(changes.name)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected())
    }
}
