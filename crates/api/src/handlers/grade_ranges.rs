//! Handlers for the grade range table.
//!
//! Writes reject bands that overlap an existing live band, so the table
//! stays a partition of 0-100 with optional gaps.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use campus_core::error::CoreError;
use campus_core::grading;
use campus_core::permissions;
use campus_core::types::DbId;
use campus_db::models::grade_range::{CreateGradeRange, GradeRange, UpdateGradeRange};
use campus_db::repositories::GradeRangeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_grade_range_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<GradeRange> {
    GradeRangeRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "GradeRange",
            id,
        })
    })
}

/// Reject `candidate` if it intersects any live band other than `skip_id`.
async fn ensure_no_overlap(
    pool: &sqlx::PgPool,
    candidate: &grading::GradeRange,
    skip_id: Option<DbId>,
) -> AppResult<()> {
    let existing: Vec<grading::GradeRange> = GradeRangeRepo::list(pool)
        .await?
        .iter()
        .filter(|r| Some(r.id) != skip_id)
        .map(GradeRange::to_domain)
        .collect();

    if let Some(other) = grading::find_overlapping_range(candidate, &existing) {
        return Err(CoreError::Conflict(format!(
            "Grade range {}-{} overlaps '{}' ({}-{})",
            candidate.min_percentage,
            candidate.max_percentage,
            other.name,
            other.min_percentage,
            other.max_percentage
        ))
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /grade-ranges
// ---------------------------------------------------------------------------

/// List all grade ranges, highest band first.
pub async fn list_grade_ranges(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_MARKS).await?;
    let items = GradeRangeRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed grade ranges");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /grade-ranges
// ---------------------------------------------------------------------------

/// Create a grade range.
pub async fn create_grade_range(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGradeRange>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::MANAGE_GRADES).await?;
    input.validate()?;

    let candidate = input.to_domain();
    grading::validate_grade_range(&candidate)?;
    ensure_no_overlap(&state.pool, &candidate, None).await?;

    let created = GradeRangeRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, user_id = auth.user_id, "Grade range created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /grade-ranges/{id}
// ---------------------------------------------------------------------------

pub async fn get_grade_range(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_MARKS).await?;
    let range = ensure_grade_range_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: range }))
}

// ---------------------------------------------------------------------------
// PUT /grade-ranges/{id}
// ---------------------------------------------------------------------------

/// Update a grade range. The merged band is validated before saving.
pub async fn update_grade_range(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGradeRange>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::MANAGE_GRADES).await?;
    input.validate()?;

    let current = ensure_grade_range_exists(&state.pool, id).await?;
    let candidate = input.merged_with(&current);
    grading::validate_grade_range(&candidate)?;
    ensure_no_overlap(&state.pool, &candidate, Some(id)).await?;

    let updated = GradeRangeRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GradeRange",
            id,
        }))?;
    tracing::info!(id, user_id = auth.user_id, "Grade range updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /grade-ranges/{id}
// ---------------------------------------------------------------------------

/// Soft-delete a grade range. Already computed grades are not revisited.
pub async fn delete_grade_range(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state.pool, &auth, permissions::MANAGE_GRADES).await?;
    if GradeRangeRepo::soft_delete(&state.pool, id, auth.user_id).await? {
        tracing::info!(id, user_id = auth.user_id, "Grade range deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "GradeRange",
            id,
        }))
    }
}
