//! Route definitions for the grade range table, mounted at `/grade-ranges`.
//!
//! ```text
//! GET    /        list_grade_ranges
//! POST   /        create_grade_range
//! GET    /{id}    get_grade_range
//! PUT    /{id}    update_grade_range
//! DELETE /{id}    delete_grade_range
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::grade_ranges;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(grade_ranges::list_grade_ranges).post(grade_ranges::create_grade_range),
        )
        .route(
            "/{id}",
            get(grade_ranges::get_grade_range)
                .put(grade_ranges::update_grade_range)
                .delete(grade_ranges::delete_grade_range),
        )
}
