//! Flat role permission matrix.
//!
//! A role carries a map from permission key to boolean. Keys are a fixed,
//! flat set of constants; categories exist only to group keys for display
//! and bulk toggling and have no effect on the allow/deny decision. Any key
//! missing from a map is denied.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// Permission key to granted flag.
pub type PermissionMap = BTreeMap<String, bool>;

// ---------------------------------------------------------------------------
// Permission keys
// ---------------------------------------------------------------------------

pub const ADD_STUDENT: &str = "addStudent";
pub const VIEW_STUDENT: &str = "viewStudent";
pub const EDIT_STUDENT: &str = "editStudent";
pub const DELETE_STUDENT: &str = "deleteStudent";

pub const ADD_EMPLOYEE: &str = "addEmployee";
pub const VIEW_EMPLOYEE: &str = "viewEmployee";
pub const EDIT_EMPLOYEE: &str = "editEmployee";
pub const DELETE_EMPLOYEE: &str = "deleteEmployee";

pub const VIEW_HEALTH: &str = "viewHealth";
pub const MANAGE_HEALTH: &str = "manageHealth";

pub const ADD_EXAM: &str = "addExam";
pub const VIEW_EXAM: &str = "viewExam";
pub const EDIT_EXAM: &str = "editExam";
pub const DELETE_EXAM: &str = "deleteExam";

pub const VIEW_MARKS: &str = "viewMarks";
pub const ENTER_MARKS: &str = "enterMarks";
pub const PUBLISH_MARKS: &str = "publishMarks";
pub const MANAGE_GRADES: &str = "manageGrades";

pub const VIEW_ROLE: &str = "viewRole";
pub const ADD_ROLE: &str = "addRole";
pub const EDIT_ROLE: &str = "editRole";
pub const DELETE_ROLE: &str = "deleteRole";

pub const VIEW_DASHBOARD: &str = "viewDashboard";
pub const MANAGE_SETTINGS: &str = "manageSettings";

/// Every known permission key.
pub const ALL_PERMISSIONS: &[&str] = &[
    ADD_STUDENT,
    VIEW_STUDENT,
    EDIT_STUDENT,
    DELETE_STUDENT,
    ADD_EMPLOYEE,
    VIEW_EMPLOYEE,
    EDIT_EMPLOYEE,
    DELETE_EMPLOYEE,
    VIEW_HEALTH,
    MANAGE_HEALTH,
    ADD_EXAM,
    VIEW_EXAM,
    EDIT_EXAM,
    DELETE_EXAM,
    VIEW_MARKS,
    ENTER_MARKS,
    PUBLISH_MARKS,
    MANAGE_GRADES,
    VIEW_ROLE,
    ADD_ROLE,
    EDIT_ROLE,
    DELETE_ROLE,
    VIEW_DASHBOARD,
    MANAGE_SETTINGS,
];

// ---------------------------------------------------------------------------
// Categories (display grouping only)
// ---------------------------------------------------------------------------

/// A named group of permission keys shown together in the role editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Category {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "students",
        keys: &[ADD_STUDENT, VIEW_STUDENT, EDIT_STUDENT, DELETE_STUDENT],
    },
    Category {
        name: "employees",
        keys: &[ADD_EMPLOYEE, VIEW_EMPLOYEE, EDIT_EMPLOYEE, DELETE_EMPLOYEE],
    },
    Category {
        name: "health",
        keys: &[VIEW_HEALTH, MANAGE_HEALTH],
    },
    Category {
        name: "exams",
        keys: &[ADD_EXAM, VIEW_EXAM, EDIT_EXAM, DELETE_EXAM],
    },
    Category {
        name: "marks",
        keys: &[VIEW_MARKS, ENTER_MARKS, PUBLISH_MARKS, MANAGE_GRADES],
    },
    Category {
        name: "roles",
        keys: &[VIEW_ROLE, ADD_ROLE, EDIT_ROLE, DELETE_ROLE],
    },
    Category {
        name: "settings",
        keys: &[VIEW_DASHBOARD, MANAGE_SETTINGS],
    },
];

/// Look up the keys of a category by name.
pub fn category_keys(name: &str) -> Result<&'static [&'static str], CoreError> {
    CATEGORIES
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.keys)
        .ok_or_else(|| CoreError::Validation(format!("Unknown permission category '{name}'")))
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub const PRESET_FULL_ACCESS: &str = "fullAccess";
pub const PRESET_READ_ONLY: &str = "readOnly";
pub const PRESET_TEACHER: &str = "teacher";
pub const PRESET_EXAM_CONTROLLER: &str = "examController";

pub const PRESET_NAMES: &[&str] = &[
    PRESET_FULL_ACCESS,
    PRESET_READ_ONLY,
    PRESET_TEACHER,
    PRESET_EXAM_CONTROLLER,
];

fn grant(keys: &[&str]) -> PermissionMap {
    keys.iter().map(|k| (k.to_string(), true)).collect()
}

/// Build the permission bundle for a named preset.
///
/// Presets only list the keys they set; applying one leaves every other key
/// of the role as it was. `readOnly` explicitly revokes every write key.
pub fn preset_by_name(name: &str) -> Result<PermissionMap, CoreError> {
    let preset = match name {
        PRESET_FULL_ACCESS => grant(ALL_PERMISSIONS),
        PRESET_READ_ONLY => ALL_PERMISSIONS
            .iter()
            .map(|k| (k.to_string(), k.starts_with("view")))
            .collect(),
        PRESET_TEACHER => grant(&[VIEW_STUDENT, VIEW_EXAM, VIEW_MARKS, ENTER_MARKS, VIEW_DASHBOARD]),
        PRESET_EXAM_CONTROLLER => grant(&[
            VIEW_STUDENT,
            ADD_EXAM,
            VIEW_EXAM,
            EDIT_EXAM,
            DELETE_EXAM,
            VIEW_MARKS,
            ENTER_MARKS,
            PUBLISH_MARKS,
            MANAGE_GRADES,
        ]),
        _ => {
            return Err(CoreError::Validation(format!(
                "Unknown preset '{name}'. Must be one of: {}",
                PRESET_NAMES.join(", ")
            )))
        }
    };
    Ok(preset)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Whether `key` is granted. Absent keys are denied.
pub fn is_allowed(permissions: &PermissionMap, key: &str) -> bool {
    permissions.get(key).copied().unwrap_or(false)
}

/// Merge a preset over the current map; preset entries win.
pub fn apply_preset(permissions: &PermissionMap, preset: &PermissionMap) -> PermissionMap {
    let mut merged = permissions.clone();
    merged.extend(preset.iter().map(|(k, v)| (k.clone(), *v)));
    merged
}

/// Set every key in `category_keys` to `value`, leaving the rest untouched.
pub fn set_category(
    permissions: &PermissionMap,
    category_keys: &[&str],
    value: bool,
) -> PermissionMap {
    let mut updated = permissions.clone();
    for key in category_keys {
        updated.insert((*key).to_string(), value);
    }
    updated
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject maps that mention keys outside [`ALL_PERMISSIONS`].
pub fn validate_permission_keys(permissions: &PermissionMap) -> Result<(), CoreError> {
    let unknown: Vec<&str> = permissions
        .keys()
        .map(String::as_str)
        .filter(|k| !ALL_PERMISSIONS.contains(k))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown permission keys: {}",
            unknown.join(", ")
        )))
    }
}

/// Expand a map so every known key has an explicit value (missing = false).
pub fn normalize(permissions: &PermissionMap) -> PermissionMap {
    ALL_PERMISSIONS
        .iter()
        .map(|k| (k.to_string(), is_allowed(permissions, k)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
