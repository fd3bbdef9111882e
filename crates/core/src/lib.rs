//! Domain types and pure business rules for the campus backend.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers load
//! data, call into these modules, and persist the results.

pub mod error;
pub mod exam;
pub mod grading;
pub mod permissions;
pub mod roles;
pub mod types;
