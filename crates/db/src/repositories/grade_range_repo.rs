//! Repository for the `grade_ranges` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::grade_range::{CreateGradeRange, GradeRange, UpdateGradeRange};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, point, min_percentage, max_percentage, remark, \
     created_by, updated_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for grade ranges.
pub struct GradeRangeRepo;

impl GradeRangeRepo {
    /// Insert a new grade range, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateGradeRange,
    ) -> Result<GradeRange, sqlx::Error> {
        let query = format!(
            "INSERT INTO grade_ranges \
                (name, point, min_percentage, max_percentage, remark, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GradeRange>(&query)
            .bind(&input.name)
            .bind(input.point)
            .bind(input.min_percentage)
            .bind(input.max_percentage)
            .bind(&input.remark)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a grade range by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GradeRange>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM grade_ranges WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, GradeRange>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all live grade ranges, highest band first.
    ///
    /// The order matters: grade lookup takes the first matching band.
    pub async fn list(pool: &PgPool) -> Result<Vec<GradeRange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM grade_ranges \
             WHERE deleted_at IS NULL \
             ORDER BY min_percentage DESC, id ASC"
        );
        sqlx::query_as::<_, GradeRange>(&query).fetch_all(pool).await
    }

    /// Update a grade range. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        updated_by: DbId,
        input: &UpdateGradeRange,
    ) -> Result<Option<GradeRange>, sqlx::Error> {
        let query = format!(
            "UPDATE grade_ranges SET \
                name = COALESCE($2, name), \
                point = COALESCE($3, point), \
                min_percentage = COALESCE($4, min_percentage), \
                max_percentage = COALESCE($5, max_percentage), \
                remark = COALESCE($6, remark), \
                updated_by = $7 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GradeRange>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.point)
            .bind(input.min_percentage)
            .bind(input.max_percentage)
            .bind(&input.remark)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a grade range. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, deleted_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE grade_ranges SET deleted_at = NOW(), updated_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
