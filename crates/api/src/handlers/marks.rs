//! Handlers for mark records: entry, publishing and class ranking.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::error::CoreError;
use campus_core::grading;
use campus_core::permissions;
use campus_core::types::DbId;
use campus_db::models::grade_range::GradeRange;
use campus_db::models::mark::{EnterMarks, MarkRecord, RankClass};
use campus_db::repositories::{GradeRangeRepo, MarkRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::query::ClassExamParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a class ranking batch.
#[derive(Debug, Serialize)]
pub struct RankingResult {
    pub class_id: DbId,
    pub exam_id: DbId,
    pub ranked: u64,
    pub records: Vec<MarkRecord>,
}

async fn ensure_mark_record_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<MarkRecord> {
    MarkRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "MarkRecord",
            id,
        })
    })
}

async fn load_grade_ranges(pool: &sqlx::PgPool) -> AppResult<Vec<grading::GradeRange>> {
    Ok(GradeRangeRepo::list(pool)
        .await?
        .iter()
        .map(GradeRange::to_domain)
        .collect())
}

// ---------------------------------------------------------------------------
// GET /marks?class_id=&exam_id=
// ---------------------------------------------------------------------------

/// List the mark records of a class in one exam, in enrollment order.
pub async fn list_marks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClassExamParams>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_MARKS).await?;
    let items = MarkRepo::list_by_class(&state.pool, params.class_id, params.exam_id).await?;
    tracing::debug!(
        class_id = params.class_id,
        exam_id = params.exam_id,
        count = items.len(),
        "Listed mark records",
    );
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /marks/{id}
// ---------------------------------------------------------------------------

pub async fn get_mark_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_MARKS).await?;
    let record = ensure_mark_record_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// PUT /marks/{id}
// ---------------------------------------------------------------------------

/// Enter marks, then recompute subject totals, grades and the record total.
///
/// The stored position is left as is until the class is ranked again.
pub async fn enter_marks(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnterMarks>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::ENTER_MARKS).await?;
    if input.entries.is_empty() {
        return Err(AppError::BadRequest("No mark entries provided".into()));
    }

    let ranges = load_grade_ranges(&state.pool).await?;

    // Row lock held until commit; concurrent entries apply one after another.
    let mut tx = state.pool.begin().await?;
    let record = MarkRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MarkRecord",
            id,
        }))?;
    let items = grading::apply_mark_entries(record.subject_items.0, &input.entries)?;
    let computed = grading::compute_mark_record(&items, &ranges)?;

    let saved = MarkRepo::save_computed(&mut *tx, id, &computed, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MarkRecord",
            id,
        }))?;
    tx.commit().await?;

    tracing::info!(
        id,
        entries = input.entries.len(),
        total_marks = saved.total_marks,
        user_id = auth.user_id,
        "Marks entered",
    );
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// POST /marks/{id}/publish
// ---------------------------------------------------------------------------

pub async fn publish_mark_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::PUBLISH_MARKS).await?;
    let published = MarkRepo::publish(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MarkRecord",
            id,
        }))?;
    tracing::info!(id, user_id = auth.user_id, "Mark record published");
    Ok(Json(DataResponse { data: published }))
}

// ---------------------------------------------------------------------------
// POST /marks/rank
// ---------------------------------------------------------------------------

/// Recompute positions for every record of a class in one exam.
pub async fn rank_class(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RankClass>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::PUBLISH_MARKS).await?;

    let records = MarkRepo::list_by_class(&state.pool, input.class_id, input.exam_id).await?;
    let ranked = grading::rank_class(records);
    let updated = MarkRepo::save_positions(&state.pool, &ranked, auth.user_id).await?;

    tracing::info!(
        class_id = input.class_id,
        exam_id = input.exam_id,
        ranked = updated,
        user_id = auth.user_id,
        "Class ranked",
    );
    Ok(Json(DataResponse {
        data: RankingResult {
            class_id: input.class_id,
            exam_id: input.exam_id,
            ranked: updated,
            records: ranked,
        },
    }))
}
