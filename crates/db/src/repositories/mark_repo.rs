//! Repository for the `mark_records` table.

use campus_core::grading::ComputedMarks;
use campus_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::mark::MarkRecord;

const COLUMNS: &str = "id, student_id, class_id, exam_id, subject_items, total_marks, \
     grade_point_average, position, published, created_by, updated_by, deleted_at, \
     created_at, updated_at";

/// Provides persistence for mark records and class ranking batches.
pub struct MarkRepo;

impl MarkRepo {
    /// Create one record per student with the given (empty) computed marks.
    ///
    /// Students already enrolled in the exam are skipped, so only newly
    /// created rows are returned. Runs in a single transaction.
    pub async fn create_batch(
        pool: &PgPool,
        class_id: DbId,
        exam_id: DbId,
        student_ids: &[DbId],
        initial: &ComputedMarks,
        created_by: DbId,
    ) -> Result<Vec<MarkRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO mark_records \
                (student_id, class_id, exam_id, subject_items, total_marks, \
                 grade_point_average, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
             ON CONFLICT (student_id, exam_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(student_ids.len());
        for &student_id in student_ids {
            let row = sqlx::query_as::<_, MarkRecord>(&query)
                .bind(student_id)
                .bind(class_id)
                .bind(exam_id)
                .bind(Json(&initial.subject_items))
                .bind(initial.total_marks)
                .bind(initial.grade_point_average)
                .bind(created_by)
                .fetch_optional(&mut *tx)
                .await?;
            created.extend(row);
        }
        tx.commit().await?;

        tracing::debug!(exam_id, requested = student_ids.len(), created = created.len(), "Mark records created");
        Ok(created)
    }

    /// Find a mark record by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MarkRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM mark_records WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, MarkRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a mark record and lock its row until the transaction ends.
    ///
    /// Concurrent mark entries on the same record queue behind the lock, so
    /// each one reads the subject items the previous one saved.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<MarkRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mark_records WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, MarkRecord>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// All records of one class in one exam, in insertion order.
    pub async fn list_by_class(
        pool: &PgPool,
        class_id: DbId,
        exam_id: DbId,
    ) -> Result<Vec<MarkRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mark_records \
             WHERE class_id = $1 AND exam_id = $2 AND deleted_at IS NULL \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, MarkRecord>(&query)
            .bind(class_id)
            .bind(exam_id)
            .fetch_all(pool)
            .await
    }

    /// Store freshly computed subject items and totals. Position is untouched.
    pub async fn save_computed<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        computed: &ComputedMarks,
        updated_by: DbId,
    ) -> Result<Option<MarkRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE mark_records SET \
                subject_items = $2, \
                total_marks = $3, \
                grade_point_average = $4, \
                updated_by = $5 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MarkRecord>(&query)
            .bind(id)
            .bind(Json(&computed.subject_items))
            .bind(computed.total_marks)
            .bind(computed.grade_point_average)
            .bind(updated_by)
            .fetch_optional(executor)
            .await
    }

    /// Mark a record as published so students can see it.
    pub async fn publish(
        pool: &PgPool,
        id: DbId,
        updated_by: DbId,
    ) -> Result<Option<MarkRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE mark_records SET published = TRUE, updated_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MarkRecord>(&query)
            .bind(id)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Write the positions of a ranked batch in one transaction.
    ///
    /// Returns the number of rows updated.
    pub async fn save_positions(
        pool: &PgPool,
        records: &[MarkRecord],
        updated_by: DbId,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for record in records {
            let result = sqlx::query(
                "UPDATE mark_records SET position = $2, updated_by = $3 \
                 WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(record.id)
            .bind(record.position)
            .bind(updated_by)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }
}
