//! Read-only permission endpoints available to any authenticated user.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::permissions::{self, Category};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::load_permissions;
use crate::query::PermissionKeyParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Every known key, its display grouping and the preset names.
#[derive(Debug, Serialize)]
pub struct PermissionCatalog {
    pub keys: &'static [&'static str],
    pub categories: &'static [Category],
    pub presets: &'static [&'static str],
}

/// Outcome of a single permission lookup for the caller.
#[derive(Debug, Serialize)]
pub struct PermissionCheck {
    pub key: String,
    pub allowed: bool,
}

/// GET /permissions/catalog
pub async fn catalog(_auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: PermissionCatalog {
            keys: permissions::ALL_PERMISSIONS,
            categories: permissions::CATEGORIES,
            presets: permissions::PRESET_NAMES,
        },
    }))
}

/// GET /permissions/check?key=
///
/// Unknown keys are reported as not allowed rather than rejected.
pub async fn check(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PermissionKeyParams>,
) -> AppResult<impl IntoResponse> {
    let perms = load_permissions(&state.pool, &auth).await?;
    let allowed = permissions::is_allowed(&perms, &params.key);
    Ok(Json(DataResponse {
        data: PermissionCheck {
            key: params.key,
            allowed,
        },
    }))
}
