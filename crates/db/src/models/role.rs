//! Role entity model and DTOs.

use campus_core::permissions::PermissionMap;
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub display_name: String,
    pub permissions: Json<PermissionMap>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a role. Omitted permissions start as an empty (deny-all) map.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    pub permissions: Option<PermissionMap>,
}

/// DTO for updating a role. `permissions`, when present, replaces the whole map.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    pub permissions: Option<PermissionMap>,
}

/// Request body for toggling a whole permission category.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCategory {
    pub enabled: bool,
}
