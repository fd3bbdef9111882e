//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated principal from a JWT Bearer token.
//! - [`rbac::require_permission`] -- Checks one permission key against the caller's role.

pub mod auth;
pub mod rbac;
