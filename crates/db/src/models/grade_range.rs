//! Grade range entity model and DTOs.

use campus_core::grading;
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `grade_ranges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GradeRange {
    pub id: DbId,
    pub name: String,
    pub point: f64,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub remark: Option<String>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GradeRange {
    /// Strip persistence fields, leaving the band used for grade lookup.
    pub fn to_domain(&self) -> grading::GradeRange {
        grading::GradeRange {
            name: self.name.clone(),
            point: self.point,
            min_percentage: self.min_percentage,
            max_percentage: self.max_percentage,
            remark: self.remark.clone(),
        }
    }
}

/// DTO for creating a grade range.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGradeRange {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub point: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_percentage: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_percentage: f64,
    pub remark: Option<String>,
}

impl CreateGradeRange {
    pub fn to_domain(&self) -> grading::GradeRange {
        grading::GradeRange {
            name: self.name.clone(),
            point: self.point,
            min_percentage: self.min_percentage,
            max_percentage: self.max_percentage,
            remark: self.remark.clone(),
        }
    }
}

/// DTO for updating a grade range. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGradeRange {
    #[validate(length(min = 1, max = 20))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub point: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_percentage: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_percentage: Option<f64>,
    pub remark: Option<String>,
}

impl UpdateGradeRange {
    /// The band this update would produce when applied to `current`.
    pub fn merged_with(&self, current: &GradeRange) -> grading::GradeRange {
        grading::GradeRange {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            point: self.point.unwrap_or(current.point),
            min_percentage: self.min_percentage.unwrap_or(current.min_percentage),
            max_percentage: self.max_percentage.unwrap_or(current.max_percentage),
            remark: self.remark.clone().or_else(|| current.remark.clone()),
        }
    }
}
