//! Handlers for exam schedules and student enrollment.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use campus_core::error::CoreError;
use campus_core::exam;
use campus_core::grading;
use campus_core::permissions;
use campus_core::types::DbId;
use campus_db::models::exam::{CreateExamSchedule, EnrollStudents, ExamSchedule, UpdateExamSchedule};
use campus_db::models::grade_range::GradeRange;
use campus_db::repositories::{ExamRepo, GradeRangeRepo, MarkRepo, SubjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_permission;
use crate::query::ClassFilter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_exam_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<ExamSchedule> {
    ExamRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "ExamSchedule",
            id,
        })
    })
}

/// Every referenced subject must exist and be live.
/// Check that every listed subject exists and that no subject name repeats.
async fn ensure_exam_subjects(pool: &sqlx::PgPool, subject_ids: &[DbId]) -> AppResult<()> {
    let found = SubjectRepo::find_by_ids(pool, subject_ids).await?;
    let mut names = Vec::with_capacity(subject_ids.len());
    for &id in subject_ids {
        let subject = found.iter().find(|s| s.id == id).ok_or(AppError::Core(
            CoreError::NotFound {
                entity: "Subject",
                id,
            },
        ))?;
        names.push(subject.name.as_str());
    }
    exam::validate_exam_subject_names(&names)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /exams
// ---------------------------------------------------------------------------

/// List exam schedules, optionally filtered by `?class_id=`.
pub async fn list_exams(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClassFilter>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_EXAM).await?;
    let items = ExamRepo::list(&state.pool, params.class_id).await?;
    tracing::debug!(count = items.len(), class_id = ?params.class_id, "Listed exams");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /exams
// ---------------------------------------------------------------------------

pub async fn create_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateExamSchedule>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::ADD_EXAM).await?;
    input.validate()?;
    exam::validate_exam_schedule(&input.name, &input.subject_ids, input.starts_at, input.ends_at)?;
    ensure_exam_subjects(&state.pool, &input.subject_ids).await?;

    let created = ExamRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, class_id = created.class_id, user_id = auth.user_id, "Exam created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /exams/{id}
// ---------------------------------------------------------------------------

pub async fn get_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::VIEW_EXAM).await?;
    let exam = ensure_exam_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: exam }))
}

// ---------------------------------------------------------------------------
// PUT /exams/{id}
// ---------------------------------------------------------------------------

/// Update an exam schedule. The merged schedule is validated as a whole.
pub async fn update_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExamSchedule>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::EDIT_EXAM).await?;
    input.validate()?;

    let current = ensure_exam_exists(&state.pool, id).await?;
    let subject_ids = input.subject_ids.as_deref().unwrap_or(&current.subject_ids);
    exam::validate_exam_schedule(
        input.name.as_deref().unwrap_or(&current.name),
        subject_ids,
        input.starts_at.unwrap_or(current.starts_at),
        input.ends_at.unwrap_or(current.ends_at),
    )?;
    if input.subject_ids.is_some() {
        ensure_exam_subjects(&state.pool, subject_ids).await?;
    }

    let updated = ExamRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ExamSchedule",
            id,
        }))?;
    tracing::info!(id, user_id = auth.user_id, "Exam updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /exams/{id}
// ---------------------------------------------------------------------------

pub async fn delete_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state.pool, &auth, permissions::DELETE_EXAM).await?;
    if ExamRepo::soft_delete(&state.pool, id, auth.user_id).await? {
        tracing::info!(id, user_id = auth.user_id, "Exam deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ExamSchedule",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// POST /exams/{id}/enroll
// ---------------------------------------------------------------------------

/// Create an empty mark record for each student in the exam's class.
///
/// Records are seeded with one subject item per exam subject and every mark
/// unset. Students already enrolled are skipped; only new records are
/// returned.
pub async fn enroll_students(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnrollStudents>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state.pool, &auth, permissions::ENTER_MARKS).await?;
    input.validate()?;

    let exam = ensure_exam_exists(&state.pool, id).await?;
    let subjects = SubjectRepo::find_by_ids(&state.pool, &exam.subject_ids).await?;
    let seeded: Vec<grading::SubjectItem> = subjects
        .iter()
        .map(|s| grading::seed_subject_item(&s.name, &s.distributions.0))
        .collect();

    let ranges: Vec<grading::GradeRange> = GradeRangeRepo::list(&state.pool)
        .await?
        .iter()
        .map(GradeRange::to_domain)
        .collect();
    let initial = grading::compute_mark_record(&seeded, &ranges)?;

    let created = MarkRepo::create_batch(
        &state.pool,
        exam.class_id,
        exam.id,
        &input.student_ids,
        &initial,
        auth.user_id,
    )
    .await?;

    tracing::info!(
        exam_id = exam.id,
        requested = input.student_ids.len(),
        created = created.len(),
        user_id = auth.user_id,
        "Students enrolled",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
