//! Route definitions for roles, mounted at `/roles`.
//!
//! ```text
//! GET    /                          list_roles
//! POST   /                          create_role
//! GET    /{id}                      get_role
//! PUT    /{id}                      update_role
//! DELETE /{id}                      delete_role
//! POST   /{id}/presets/{preset}     apply_preset
//! PUT    /{id}/categories/{cat}     set_category
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roles::list_roles).post(roles::create_role))
        .route(
            "/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        .route("/{id}/presets/{preset}", post(roles::apply_preset))
        .route("/{id}/categories/{category}", put(roles::set_category))
}
