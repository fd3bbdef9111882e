//! Route definitions for permission lookups, mounted at `/permissions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::permissions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(permissions::catalog))
        .route("/check", get(permissions::check))
}
