//! Shared query parameter types for API handlers.

use campus_core::types::DbId;
use serde::Deserialize;

/// `?class_id=` filter for exam listings.
#[derive(Debug, Deserialize)]
pub struct ClassFilter {
    pub class_id: Option<DbId>,
}

/// `?class_id=&exam_id=` selector for mark record listings.
#[derive(Debug, Deserialize)]
pub struct ClassExamParams {
    pub class_id: DbId,
    pub exam_id: DbId,
}

/// `?key=` for permission checks.
#[derive(Debug, Deserialize)]
pub struct PermissionKeyParams {
    pub key: String,
}
