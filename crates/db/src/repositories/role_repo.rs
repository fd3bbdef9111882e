//! Repository for the `roles` table.

use campus_core::permissions::PermissionMap;
use campus_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::role::{CreateRole, Role};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, display_name, permissions, created_by, updated_by, \
     deleted_at, created_at, updated_at";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role with the given permission map.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateRole,
        permissions: &PermissionMap,
    ) -> Result<Role, sqlx::Error> {
        let query = format!(
            "INSERT INTO roles (name, display_name, permissions, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(&input.name)
            .bind(&input.display_name)
            .bind(Json(permissions))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a role by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE deleted_at IS NULL ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// Save a role document: display name and/or the whole permission map.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        updated_by: DbId,
        display_name: Option<&str>,
        permissions: Option<&PermissionMap>,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET \
                display_name = COALESCE($2, display_name), \
                permissions = COALESCE($3, permissions), \
                updated_by = $4 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(display_name)
            .bind(permissions.map(Json))
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Number of users currently holding the role.
    pub async fn count_users(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a role. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while users still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
