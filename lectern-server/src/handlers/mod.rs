pub mod admin;
pub mod catalog;
pub mod enrollments;
pub mod progress;
