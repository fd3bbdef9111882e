//! Subject entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `subjects` table.
///
/// `distributions` is the ordered list of scored components (e.g. midterm,
/// final) that every mark record for this subject is seeded with.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub distributions: Json<Vec<String>>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a subject.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 20))]
    pub code: Option<String>,
    pub distributions: Vec<String>,
}

/// DTO for updating a subject. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 20))]
    pub code: Option<String>,
    pub distributions: Option<Vec<String>>,
}
