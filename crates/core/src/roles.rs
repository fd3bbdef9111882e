//! Well-known role names and role name validation.
//!
//! These must match the seed data in `0001_initial_schema.sql`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STAFF: &str = "staff";

/// Maximum length for a role name or display name.
pub const MAX_ROLE_NAME_LEN: usize = 100;

/// Validate a role name: non-empty, within length, lowercase slug characters.
pub fn validate_role_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Role name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_ROLE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Role name too long: {} chars (max {MAX_ROLE_NAME_LEN})",
            name.len()
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Role name '{name}' may only contain lowercase letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}
