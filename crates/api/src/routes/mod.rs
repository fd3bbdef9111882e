pub mod exams;
pub mod grade_ranges;
pub mod health;
pub mod marks;
pub mod permissions;
pub mod roles;
pub mod subjects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /grade-ranges                    list, create
/// /grade-ranges/{id}               get, update, delete
///
/// /subjects                        list, create
/// /subjects/{id}                   get, update, delete
///
/// /exams                           list (?class_id=), create
/// /exams/{id}                      get, update, delete
/// /exams/{id}/enroll               seed empty mark records (POST)
///
/// /marks                           list (?class_id=&exam_id=)
/// /marks/rank                      rank a class in one exam (POST)
/// /marks/{id}                      get, enter marks (PUT)
/// /marks/{id}/publish              publish (POST)
///
/// /roles                           list, create
/// /roles/{id}                      get, update, delete
/// /roles/{id}/presets/{preset}     apply preset (POST)
/// /roles/{id}/categories/{cat}     toggle category (PUT)
///
/// /permissions/catalog             keys, categories, presets
/// /permissions/check               caller's access to one key (?key=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/grade-ranges", grade_ranges::router())
        .nest("/subjects", subjects::router())
        .nest("/exams", exams::router())
        .nest("/marks", marks::router())
        .nest("/roles", roles::router())
        .nest("/permissions", permissions::router())
}
