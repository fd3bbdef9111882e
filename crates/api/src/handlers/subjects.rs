//! Handlers for subject definitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use campus_core::error::CoreError;
use campus_core::exam;
use campus_core::permissions;
use campus_core::types::DbId;
use campus_db::models::subject::{CreateSubject, Subject, UpdateSubject};
use campus_db::repositories::SubjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_subject_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Subject> {
    SubjectRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Subject",
            id,
        })
    })
}

/// GET /subjects
pub async fn list_subjects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_EXAM).await?;
    let items = SubjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /subjects
pub async fn create_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSubject>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::ADD_EXAM).await?;
    input.validate()?;
    exam::validate_subject(&input.name, &input.distributions)?;

    let created = SubjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, user_id = auth.user_id, "Subject created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /subjects/{id}
pub async fn get_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_EXAM).await?;
    let subject = ensure_subject_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: subject }))
}

/// PUT /subjects/{id}
pub async fn update_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubject>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::EDIT_EXAM).await?;
    input.validate()?;

    let current = ensure_subject_exists(&state.pool, id).await?;
    let name = input.name.as_deref().unwrap_or(&current.name);
    let distributions = input
        .distributions
        .as_deref()
        .unwrap_or(&current.distributions.0);
    exam::validate_subject(name, distributions)?;

    let updated = SubjectRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subject",
            id,
        }))?;
    tracing::info!(id, user_id = auth.user_id, "Subject updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /subjects/{id}
pub async fn delete_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state.pool, &auth, permissions::DELETE_EXAM).await?;
    if SubjectRepo::soft_delete(&state.pool, id, auth.user_id).await? {
        tracing::info!(id, user_id = auth.user_id, "Subject deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Subject",
            id,
        }))
    }
}
