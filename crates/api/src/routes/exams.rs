//! Route definitions for exam schedules, mounted at `/exams`.
//!
//! ```text
//! GET    /              list_exams (?class_id=)
//! POST   /              create_exam
//! GET    /{id}          get_exam
//! PUT    /{id}          update_exam
//! DELETE /{id}          delete_exam
//! POST   /{id}/enroll   enroll_students
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::exams;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(exams::list_exams).post(exams::create_exam))
        .route(
            "/{id}",
            get(exams::get_exam)
                .put(exams::update_exam)
                .delete(exams::delete_exam),
        )
        .route("/{id}/enroll", post(exams::enroll_students))
}
