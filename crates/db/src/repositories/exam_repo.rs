//! Repository for the `exam_schedules` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::exam::{CreateExamSchedule, ExamSchedule, UpdateExamSchedule};

const COLUMNS: &str = "id, name, class_id, subject_ids, hall_name, starts_at, ends_at, \
     created_by, updated_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for exam schedules.
pub struct ExamRepo;

impl ExamRepo {
    /// Insert a new exam schedule, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateExamSchedule,
    ) -> Result<ExamSchedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO exam_schedules \
                (name, class_id, subject_ids, hall_name, starts_at, ends_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExamSchedule>(&query)
            .bind(&input.name)
            .bind(input.class_id)
            .bind(&input.subject_ids)
            .bind(&input.hall_name)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an exam schedule by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ExamSchedule>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM exam_schedules WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ExamSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List exam schedules, optionally for one class, soonest first.
    pub async fn list(
        pool: &PgPool,
        class_id: Option<DbId>,
    ) -> Result<Vec<ExamSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exam_schedules \
             WHERE deleted_at IS NULL AND ($1::BIGINT IS NULL OR class_id = $1) \
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, ExamSchedule>(&query)
            .bind(class_id)
            .fetch_all(pool)
            .await
    }

    /// Update an exam schedule. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        updated_by: DbId,
        input: &UpdateExamSchedule,
    ) -> Result<Option<ExamSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE exam_schedules SET \
                name = COALESCE($2, name), \
                subject_ids = COALESCE($3, subject_ids), \
                hall_name = COALESCE($4, hall_name), \
                starts_at = COALESCE($5, starts_at), \
                ends_at = COALESCE($6, ends_at), \
                updated_by = $7 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExamSchedule>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.subject_ids)
            .bind(&input.hall_name)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an exam schedule. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, deleted_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE exam_schedules SET deleted_at = NOW(), updated_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
