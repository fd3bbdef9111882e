//! Exam schedule and subject validation.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length for an exam or subject name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum number of distributions a subject may define.
pub const MAX_DISTRIBUTIONS: usize = 20;

fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{kind} name must not be empty")));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{kind} name too long: {len} chars (max {MAX_NAME_LEN})"
        )));
    }
    Ok(())
}

/// Validate a subject's name and its distribution list.
///
/// Distribution names must be non-empty and unique within the subject, since
/// mark entry addresses them by name.
pub fn validate_subject(name: &str, distributions: &[String]) -> Result<(), CoreError> {
    validate_name("Subject", name)?;
    if distributions.is_empty() {
        return Err(CoreError::Validation(
            "A subject needs at least one distribution".to_string(),
        ));
    }
    if distributions.len() > MAX_DISTRIBUTIONS {
        return Err(CoreError::Validation(format!(
            "Too many distributions: {} (max {MAX_DISTRIBUTIONS})",
            distributions.len()
        )));
    }
    for (i, d) in distributions.iter().enumerate() {
        if d.trim().is_empty() {
            return Err(CoreError::Validation(
                "Distribution names must not be empty".to_string(),
            ));
        }
        if distributions[..i].contains(d) {
            return Err(CoreError::Validation(format!(
                "Duplicate distribution '{d}'"
            )));
        }
    }
    Ok(())
}

/// Validate an exam schedule before it is stored.
pub fn validate_exam_schedule(
    name: &str,
    subject_ids: &[DbId],
    starts_at: Timestamp,
    ends_at: Timestamp,
) -> Result<(), CoreError> {
    validate_name("Exam", name)?;
    if subject_ids.is_empty() {
        return Err(CoreError::Validation(
            "An exam must cover at least one subject".to_string(),
        ));
    }
    if ends_at <= starts_at {
        return Err(CoreError::Validation(format!(
            "Exam must end after it starts ({starts_at} >= {ends_at})"
        )));
    }
    Ok(())
}

/// Subjects of one exam must have distinct names.
///
/// Mark entries address subject items by name, so a repeated name would
/// leave the second subject unreachable.
pub fn validate_exam_subject_names<S: AsRef<str>>(names: &[S]) -> Result<(), CoreError> {
    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if names[..i].iter().any(|n| n.as_ref() == name) {
            return Err(CoreError::Validation(format!(
                "Exam lists subject '{name}' more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn valid_subject_accepted() {
        assert!(validate_subject("Mathematics", &names(&["midterm", "final"])).is_ok());
    }

    #[test]
    fn subject_without_distributions_rejected() {
        assert!(validate_subject("Mathematics", &[]).is_err());
    }

    #[test]
    fn duplicate_distribution_rejected() {
        let err = validate_subject("Physics", &names(&["lab", "final", "lab"])).unwrap_err();
        assert!(err.to_string().contains("Duplicate distribution 'lab'"));
    }

    #[test]
    fn valid_exam_accepted() {
        let s = start();
        assert!(validate_exam_schedule("Term 1", &[1, 2], s, s + Duration::hours(3)).is_ok());
    }

    #[test]
    fn exam_ending_before_start_rejected() {
        let s = start();
        let err = validate_exam_schedule("Term 1", &[1], s, s - Duration::minutes(1)).unwrap_err();
        assert!(err.to_string().contains("must end after"));
    }

    #[test]
    fn exam_without_subjects_rejected() {
        let s = start();
        assert!(validate_exam_schedule("Term 1", &[], s, s + Duration::hours(1)).is_err());
    }

    #[test]
    fn blank_exam_name_rejected() {
        let s = start();
        assert!(validate_exam_schedule("   ", &[1], s, s + Duration::hours(1)).is_err());
    }

    #[test]
    fn exam_subject_names_distinct_accepted() {
        assert!(validate_exam_subject_names(&["Mathematics", "Physics"]).is_ok());
    }

    #[test]
    fn exam_subject_names_repeated_rejected() {
        let err =
            validate_exam_subject_names(&names(&["Mathematics", "Physics", "Mathematics"]))
                .unwrap_err();
        assert_matches::assert_matches!(
            err,
            CoreError::Validation(msg) if msg.contains("'Mathematics' more than once")
        );
    }

    #[test]
    fn long_multibyte_name_counts_characters() {
        let s = start();
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_exam_schedule(&name, &[1], s, s + Duration::hours(1)).is_ok());
    }
}
