//! Mark aggregation, grade lookup, and class ranking.
//!
//! A student's mark record is a list of subjects, each made of ordered
//! distribution items (midterm, final, ...). Subject totals are the sum of
//! entered marks, grades come from an administrator-maintained table of
//! percentage bands, and positions are assigned per class by total.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Constants
   -------------------------------------------------------------------------- */

/// Grade returned when no range contains a total.
pub const FALLBACK_GRADE: &str = "F";

/// Grade point paired with [`FALLBACK_GRADE`].
pub const FALLBACK_GRADE_POINT: f64 = 0.0;

/// Lower bound of the percentage domain.
pub const MIN_PERCENTAGE: f64 = 0.0;

/// Upper bound of the percentage domain.
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Maximum length for a grade name.
pub const MAX_GRADE_NAME_LEN: usize = 20;

/// Totals closer than this are considered tied when ranking.
const TIE_EPSILON: f64 = 1e-9;

/* --------------------------------------------------------------------------
   Types
   -------------------------------------------------------------------------- */

/// A percentage band mapped to a letter grade and grade point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRange {
    pub name: String,
    pub point: f64,
    pub min_percentage: f64,
    pub max_percentage: f64,
    #[serde(default)]
    pub remark: Option<String>,
}

/// One scored component of a subject. `mark` is `None` until entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionItem {
    pub distribution_name: String,
    #[serde(default)]
    pub mark: Option<f64>,
}

/// A subject within a mark record. The last three fields are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectItem {
    pub subject_name: String,
    pub distribution_items: Vec<DistributionItem>,
    #[serde(default)]
    pub total_mark: f64,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub grade_point: f64,
}

/// Output of [`compute_mark_record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedMarks {
    pub subject_items: Vec<SubjectItem>,
    pub total_marks: f64,
    pub grade_point_average: f64,
}

/// A single mark typed in by a teacher.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkEntry {
    pub subject_name: String,
    pub distribution_name: String,
    pub mark: Option<f64>,
}

/// A record that can take part in a class ranking.
pub trait Ranked {
    fn total_marks(&self) -> f64;
    fn set_position(&mut self, position: i32);
}

/* --------------------------------------------------------------------------
   Computation
   -------------------------------------------------------------------------- */

fn validate_mark(subject: Option<&str>, item: &DistributionItem) -> Result<(), CoreError> {
    let at = match subject {
        Some(name) => format!("'{}' in '{name}'", item.distribution_name),
        None => format!("'{}'", item.distribution_name),
    };
    match item.mark {
        Some(mark) if !mark.is_finite() => Err(CoreError::Validation(format!(
            "Mark for {at} is not a number"
        ))),
        Some(mark) if mark < 0.0 => Err(CoreError::Validation(format!(
            "Mark for {at} must not be negative, got {mark}"
        ))),
        _ => Ok(()),
    }
}

/// Sum one subject's marks, rejecting invalid marks and overflowing totals.
fn sum_marks(subject: Option<&str>, distribution_items: &[DistributionItem]) -> Result<f64, CoreError> {
    let mut total = 0.0;
    for item in distribution_items {
        validate_mark(subject, item)?;
        total += item.mark.unwrap_or(0.0);
    }
    if !total.is_finite() {
        return Err(CoreError::Validation(match subject {
            Some(name) => format!("Total mark for '{name}' is out of range"),
            None => "Total mark is out of range".to_string(),
        }));
    }
    Ok(total)
}

/// Sum the entered marks of a subject. Missing marks count as zero.
///
/// A total that overflows to infinity is rejected: it could not be stored
/// as a JSON number.
pub fn compute_subject_total(distribution_items: &[DistributionItem]) -> Result<f64, CoreError> {
    sum_marks(None, distribution_items)
}

/// Return the first range whose inclusive bounds contain `total_mark`.
///
/// Ranges are scanned in the given order, so overlapping bands resolve to
/// whichever comes first.
pub fn find_grade_range(total_mark: f64, grade_ranges: &[GradeRange]) -> Option<&GradeRange> {
    grade_ranges
        .iter()
        .find(|r| r.min_percentage <= total_mark && total_mark <= r.max_percentage)
}

/// Letter grade for a total, or [`FALLBACK_GRADE`] when no range matches.
pub fn assign_grade(total_mark: f64, grade_ranges: &[GradeRange]) -> &str {
    find_grade_range(total_mark, grade_ranges)
        .map(|r| r.name.as_str())
        .unwrap_or(FALLBACK_GRADE)
}

/// Fill in totals and grades for every subject and sum the record total.
///
/// Pure: identical inputs always produce identical output.
pub fn compute_mark_record(
    subject_items: &[SubjectItem],
    grade_ranges: &[GradeRange],
) -> Result<ComputedMarks, CoreError> {
    let mut computed = Vec::with_capacity(subject_items.len());
    let mut total_marks = 0.0;
    let mut point_sum = 0.0;

    for subject in subject_items {
        let total_mark = sum_marks(Some(&subject.subject_name), &subject.distribution_items)?;
        let (grade, grade_point) = match find_grade_range(total_mark, grade_ranges) {
            Some(range) => (range.name.clone(), range.point),
            None => (FALLBACK_GRADE.to_string(), FALLBACK_GRADE_POINT),
        };

        total_marks += total_mark;
        point_sum += grade_point;
        computed.push(SubjectItem {
            subject_name: subject.subject_name.clone(),
            distribution_items: subject.distribution_items.clone(),
            total_mark,
            grade,
            grade_point,
        });
    }

    if !total_marks.is_finite() {
        return Err(CoreError::Validation(
            "Record total is out of range".to_string(),
        ));
    }

    let grade_point_average = if computed.is_empty() {
        0.0
    } else {
        point_sum / computed.len() as f64
    };

    Ok(ComputedMarks {
        subject_items: computed,
        total_marks,
        grade_point_average,
    })
}

/// Assign class positions by total, highest first.
///
/// Uses competition ranking: equal totals share the better position and the
/// next distinct total skips ahead (90, 75, 75, 60 ranks as 1, 2, 2, 4).
/// The sort is stable, so tied records keep their input order.
pub fn rank_class<T: Ranked>(mut records: Vec<T>) -> Vec<T> {
    records.sort_by(|a, b| b.total_marks().total_cmp(&a.total_marks()));

    let mut previous: Option<f64> = None;
    let mut position = 0;
    for (index, record) in records.iter_mut().enumerate() {
        let total = record.total_marks();
        let tied = previous.is_some_and(|p| (p - total).abs() < TIE_EPSILON);
        if !tied {
            position = index as i32 + 1;
        }
        previous = Some(total);
        record.set_position(position);
    }
    records
}

/* --------------------------------------------------------------------------
   Mark entry
   -------------------------------------------------------------------------- */

/// Build an empty subject item (all marks unset) from a subject definition.
pub fn seed_subject_item(subject_name: &str, distributions: &[String]) -> SubjectItem {
    SubjectItem {
        subject_name: subject_name.to_string(),
        distribution_items: distributions
            .iter()
            .map(|d| DistributionItem {
                distribution_name: d.clone(),
                mark: None,
            })
            .collect(),
        total_mark: 0.0,
        grade: String::new(),
        grade_point: 0.0,
    }
}

/// Write teacher-entered marks into existing subject items.
///
/// Every entry must name a subject and distribution already present in the
/// record. Derived fields are left stale; run [`compute_mark_record`] after.
pub fn apply_mark_entries(
    mut subject_items: Vec<SubjectItem>,
    entries: &[MarkEntry],
) -> Result<Vec<SubjectItem>, CoreError> {
    for entry in entries {
        let subject = subject_items
            .iter_mut()
            .find(|s| s.subject_name == entry.subject_name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Subject '{}' is not part of this mark record",
                    entry.subject_name
                ))
            })?;
        let item = subject
            .distribution_items
            .iter_mut()
            .find(|d| d.distribution_name == entry.distribution_name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Distribution '{}' is not part of subject '{}'",
                    entry.distribution_name, entry.subject_name
                ))
            })?;
        item.mark = entry.mark;
        validate_mark(Some(&entry.subject_name), item)?;
    }
    Ok(subject_items)
}

/* --------------------------------------------------------------------------
   Grade range validation
   -------------------------------------------------------------------------- */

/// Validate a single grade range in isolation.
pub fn validate_grade_range(range: &GradeRange) -> Result<(), CoreError> {
    if range.name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Grade name must not be empty".to_string(),
        ));
    }
    let name_len = range.name.chars().count();
    if name_len > MAX_GRADE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Grade name too long: {name_len} chars (max {MAX_GRADE_NAME_LEN})"
        )));
    }
    if !range.point.is_finite() || range.point < 0.0 {
        return Err(CoreError::Validation(format!(
            "Grade point must be a non-negative number, got {}",
            range.point
        )));
    }
    let in_domain = |v: f64| (MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&v);
    if !in_domain(range.min_percentage) || !in_domain(range.max_percentage) {
        return Err(CoreError::Validation(format!(
            "Percentages must be between {MIN_PERCENTAGE} and {MAX_PERCENTAGE}, got {}-{}",
            range.min_percentage, range.max_percentage
        )));
    }
    if range.min_percentage > range.max_percentage {
        return Err(CoreError::Validation(format!(
            "min_percentage ({}) must be <= max_percentage ({})",
            range.min_percentage, range.max_percentage
        )));
    }
    Ok(())
}

/// Return the first existing range whose bounds intersect `candidate`.
pub fn find_overlapping_range<'a>(
    candidate: &GradeRange,
    existing: &'a [GradeRange],
) -> Option<&'a GradeRange> {
    existing.iter().find(|r| {
        candidate.min_percentage <= r.max_percentage && r.min_percentage <= candidate.max_percentage
    })
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
