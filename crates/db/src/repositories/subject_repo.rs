//! Repository for the `subjects` table.

use campus_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::subject::{CreateSubject, Subject, UpdateSubject};

const COLUMNS: &str = "id, name, code, distributions, created_by, updated_by, deleted_at, \
     created_at, updated_at";

/// Provides CRUD operations for subjects.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateSubject,
    ) -> Result<Subject, sqlx::Error> {
        let query = format!(
            "INSERT INTO subjects (name, code, distributions, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(Json(&input.distributions))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a subject by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several subjects, preserving the order of `ids`.
    ///
    /// Missing or soft-deleted IDs are skipped; callers compare lengths to
    /// detect them.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subjects \
             WHERE id = ANY($1) AND deleted_at IS NULL \
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all subjects ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subjects WHERE deleted_at IS NULL ORDER BY name ASC"
        );
        sqlx::query_as::<_, Subject>(&query).fetch_all(pool).await
    }

    /// Update a subject. Only non-`None` fields are applied.
    ///
    /// Existing mark records keep the distributions they were seeded with.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        updated_by: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET \
                name = COALESCE($2, name), \
                code = COALESCE($3, code), \
                distributions = COALESCE($4, distributions), \
                updated_by = $5 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.distributions.as_ref().map(Json))
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a subject. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, deleted_by: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subjects SET deleted_at = NOW(), updated_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
