use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Inclusive bounds of `grades.value`.
pub const GRADE_MIN: i32 = 0;
pub const GRADE_MAX: i32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i32,
    pub student_id: i32,
    pub discipline_id: i32,
    pub teacher_id: i32,
    pub value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub student_id: i32,
    pub discipline_id: i32,
    pub teacher_id: i32,
    pub value: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChanges {
    pub student_id: Option<i32>,
    pub discipline_id: Option<i32>,
    pub teacher_id: Option<i32>,
    pub value: Option<i32>,
}

impl GradeChanges {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none()
            && self.discipline_id.is_none()
            && self.teacher_id.is_none()
            && self.value.is_none()
    }
}

pub fn is_valid_grade_value(value: i32) -> bool {
    (GRADE_MIN..=GRADE_MAX).contains(&value)
}
