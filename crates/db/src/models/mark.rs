//! Mark record entity model and DTOs.

use campus_core::grading::{MarkEntry, Ranked, SubjectItem};
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `mark_records` table: one student's results in one exam.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MarkRecord {
    pub id: DbId,
    pub student_id: DbId,
    pub class_id: DbId,
    pub exam_id: DbId,
    pub subject_items: Json<Vec<SubjectItem>>,
    pub total_marks: f64,
    pub grade_point_average: f64,
    /// `None` until the class has been ranked.
    pub position: Option<i32>,
    pub published: bool,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ranked for MarkRecord {
    fn total_marks(&self) -> f64 {
        self.total_marks
    }

    fn set_position(&mut self, position: i32) {
        self.position = Some(position);
    }
}

/// Request body for entering marks into a record.
#[derive(Debug, Clone, Deserialize)]
pub struct EnterMarks {
    pub entries: Vec<MarkEntry>,
}

/// Request body for ranking every record of a class in one exam.
#[derive(Debug, Clone, Deserialize)]
pub struct RankClass {
    pub class_id: DbId,
    pub exam_id: DbId,
}
