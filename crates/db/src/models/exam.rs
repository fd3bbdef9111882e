//! Exam schedule entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `exam_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamSchedule {
    pub id: DbId,
    pub name: String,
    pub class_id: DbId,
    pub subject_ids: Vec<DbId>,
    pub hall_name: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling an exam.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExamSchedule {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub class_id: DbId,
    #[validate(length(min = 1))]
    pub subject_ids: Vec<DbId>,
    #[validate(length(max = 100))]
    pub hall_name: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// DTO for rescheduling an exam. All fields are optional.
///
/// `class_id` is fixed at creation; enrolled mark records depend on it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExamSchedule {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub subject_ids: Option<Vec<DbId>>,
    #[validate(length(max = 100))]
    pub hall_name: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

/// Request body for enrolling students in an exam.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EnrollStudents {
    #[validate(length(min = 1, max = 500))]
    pub student_ids: Vec<DbId>,
}
