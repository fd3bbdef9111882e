//! Route definitions for subjects, mounted at `/subjects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::subjects;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subjects::list_subjects).post(subjects::create_subject))
        .route(
            "/{id}",
            get(subjects::get_subject)
                .put(subjects::update_subject)
                .delete(subjects::delete_subject),
        )
}
