use async_trait::async_trait;

use super::PgUnitOfWork;
use crate::database::manager::DatabaseError;
use crate::database::models::GroupDiscipline;
use crate::database::repository::GroupDisciplineRepository;

const COLUMNS: &str = "group_id, discipline_id, created_at, updated_at";

#[async_trait]
impl GroupDisciplineRepository for PgUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM group_disciplines ORDER BY group_id, discipline_id");
        Ok(sqlx::query_as::<_, GroupDiscipline>(&sql).fetch_all(self.conn()).await?)
    }

    async fn find_all_by_group_id(&mut self, group_id: i32) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM group_disciplines WHERE group_id = $1 ORDER BY discipline_id");
        Ok(sqlx::query_as::<_, GroupDiscipline>(&sql).bind(group_id).fetch_all(self.conn()).await?)
    }

    async fn find_all_by_discipline_id(
        &mut self,
        discipline_id: i32,
    ) -> Result<Vec<GroupDiscipline>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM group_disciplines WHERE discipline_id = $1 ORDER BY group_id");
        Ok(sqlx::query_as::<_, GroupDiscipline>(&sql)
            .bind(discipline_id)
            .fetch_all(self.conn())
            .await?)
    }

    async fn create(&mut self, group_id: i32, discipline_id: i32) -> Result<GroupDiscipline, DatabaseError> {
        let sql = format!(
            "INSERT INTO group_disciplines (group_id, discipline_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupDiscipline>(&sql)
            .bind(group_id)
            .bind(discipline_id)
            .fetch_one(self.conn())
            .await?;
        Ok(row)
    }
}
