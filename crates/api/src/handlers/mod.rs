pub mod exams;
pub mod grade_ranges;
pub mod marks;
pub mod permissions;
pub mod roles;
pub mod subjects;
