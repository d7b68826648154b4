use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    pub id: i32,
    pub name: String,
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDiscipline {
    pub name: String,
    pub teacher_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineChanges {
    pub name: Option<String>,
    pub teacher_id: Option<i32>,
}

impl DisciplineChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.teacher_id.is_none()
    }
}
