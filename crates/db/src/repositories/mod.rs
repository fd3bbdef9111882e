//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Reads hide soft-deleted rows.

pub mod exam_repo;
pub mod grade_range_repo;
pub mod mark_repo;
pub mod role_repo;
pub mod subject_repo;
pub mod user_repo;

pub use exam_repo::ExamRepo;
pub use grade_range_repo::GradeRangeRepo;
pub use mark_repo::MarkRepo;
pub use role_repo::RoleRepo;
pub use subject_repo::SubjectRepo;
pub use user_repo::UserRepo;
