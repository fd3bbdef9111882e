//! Route definitions for mark records, mounted at `/marks`.
//!
//! ```text
//! GET    /               list_marks (?class_id=&exam_id=)
//! POST   /rank           rank_class
//! GET    /{id}           get_mark_record
//! PUT    /{id}           enter_marks
//! POST   /{id}/publish   publish_mark_record
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::marks;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(marks::list_marks))
        .route("/rank", post(marks::rank_class))
        .route("/{id}", get(marks::get_mark_record).put(marks::enter_marks))
        .route("/{id}/publish", post(marks::publish_mark_record))
}
