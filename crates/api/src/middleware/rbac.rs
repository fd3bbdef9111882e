//! Permission checks against the caller's current role.
//!
//! The role is resolved from the user row rather than the token, so edits to
//! a role's permission map take effect on the next request.

use campus_core::error::CoreError;
use campus_core::permissions::{self, PermissionMap};
use campus_db::repositories::{RoleRepo, UserRepo};
use sqlx::PgPool;

use super::auth::AuthUser;
use crate::error::AppResult;

/// Load the permission map of the caller's role.
///
/// Unknown or deactivated users are rejected as unauthorized. A user whose
/// role has vanished gets an empty (deny-all) map.
pub async fn load_permissions(pool: &PgPool, auth: &AuthUser) -> AppResult<PermissionMap> {
    let user = UserRepo::find_by_id(pool, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized("Unknown or inactive user".into()))?;

    let perms = RoleRepo::find_by_id(pool, user.role_id)
        .await?
        .map(|r| r.permissions.0)
        .unwrap_or_default();
    Ok(perms)
}

/// Reject with 403 Forbidden unless the caller's role grants `key`.
///
/// ```ignore
/// require_permission(&state.pool, &auth, permissions::ENTER_MARKS).await?;
/// ```
pub async fn require_permission(pool: &PgPool, auth: &AuthUser, key: &str) -> AppResult<()> {
    let perms = load_permissions(pool, auth).await?;
    if permissions::is_allowed(&perms, key) {
        Ok(())
    } else {
        tracing::debug!(user_id = auth.user_id, role = %auth.role, permission = key, "Permission denied");
        Err(CoreError::Forbidden(format!("Permission '{key}' required")).into())
    }
}
