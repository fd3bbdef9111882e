//! Handlers for roles and their permission maps.
//!
//! Stored maps are normalized so every known key carries an explicit
//! boolean. Presets and category toggles are applied on top of the current
//! map and saved back as a whole.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use campus_core::error::CoreError;
use campus_core::permissions::{self, PermissionMap};
use campus_core::roles;
use campus_core::types::DbId;
use campus_db::models::role::{CreateRole, Role, SetCategory, UpdateRole};
use campus_db::repositories::RoleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_role_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Role> {
    RoleRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Role",
            id,
        })
    })
}

/// Save a new permission map for a role.
async fn save_permissions(
    pool: &sqlx::PgPool,
    id: DbId,
    updated_by: DbId,
    map: &PermissionMap,
) -> AppResult<Role> {
    RoleRepo::update(pool, id, updated_by, None, Some(map))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Role",
            id,
        }))
}

// ---------------------------------------------------------------------------
// GET /roles
// ---------------------------------------------------------------------------

pub async fn list_roles(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_ROLE).await?;
    let items = RoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /roles
// ---------------------------------------------------------------------------

/// Create a role. Omitted permissions start as deny-all.
pub async fn create_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRole>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::ADD_ROLE).await?;
    input.validate()?;
    roles::validate_role_name(&input.name)?;

    let requested = input.permissions.clone().unwrap_or_default();
    permissions::validate_permission_keys(&requested)?;
    let map = permissions::normalize(&requested);

    let created = RoleRepo::create(&state.pool, auth.user_id, &input, &map).await?;
    tracing::info!(id = created.id, name = %created.name, user_id = auth.user_id, "Role created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /roles/{id}
// ---------------------------------------------------------------------------

pub async fn get_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_ROLE).await?;
    let role = ensure_role_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: role }))
}

// ---------------------------------------------------------------------------
// PUT /roles/{id}
// ---------------------------------------------------------------------------

/// Update a role's display name and/or replace its whole permission map.
pub async fn update_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::EDIT_ROLE).await?;
    input.validate()?;

    let map = match &input.permissions {
        Some(requested) => {
            permissions::validate_permission_keys(requested)?;
            Some(permissions::normalize(requested))
        }
        None => None,
    };

    let updated = RoleRepo::update(
        &state.pool,
        id,
        auth.user_id,
        input.display_name.as_deref(),
        map.as_ref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Role",
        id,
    }))?;
    tracing::info!(id, user_id = auth.user_id, "Role updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /roles/{id}
// ---------------------------------------------------------------------------

/// Delete a role. Refused while any user still holds it.
pub async fn delete_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state.pool, &auth, permissions::DELETE_ROLE).await?;

    let role = ensure_role_exists(&state.pool, id).await?;
    let holders = RoleRepo::count_users(&state.pool, id).await?;
    if holders > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role '{}' is still assigned to {holders} user(s)",
            role.name
        ))));
    }

    if RoleRepo::delete(&state.pool, id).await? {
        tracing::info!(id, name = %role.name, user_id = auth.user_id, "Role deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Role", id }))
    }
}

// ---------------------------------------------------------------------------
// POST /roles/{id}/presets/{preset}
// ---------------------------------------------------------------------------

/// Overlay a named preset onto the role's current permissions.
pub async fn apply_preset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, preset)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::EDIT_ROLE).await?;

    let preset_map = permissions::preset_by_name(&preset)?;
    let role = ensure_role_exists(&state.pool, id).await?;
    let map = permissions::normalize(&permissions::apply_preset(&role.permissions.0, &preset_map));

    let saved = save_permissions(&state.pool, id, auth.user_id, &map).await?;
    tracing::info!(id, preset = %preset, user_id = auth.user_id, "Permission preset applied");
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// PUT /roles/{id}/categories/{category}
// ---------------------------------------------------------------------------

/// Grant or revoke every permission in one category.
pub async fn set_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, category)): Path<(DbId, String)>,
    Json(input): Json<SetCategory>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::EDIT_ROLE).await?;

    let keys = permissions::category_keys(&category)?;
    let role = ensure_role_exists(&state.pool, id).await?;
    let map = permissions::normalize(&permissions::set_category(
        &role.permissions.0,
        keys,
        input.enabled,
    ));

    let saved = save_permissions(&state.pool, id, auth.user_id, &map).await?;
    tracing::info!(
        id,
        category = %category,
        enabled = input.enabled,
        user_id = auth.user_id,
        "Permission category toggled",
    );
    Ok(Json(DataResponse { data: saved }))
}
