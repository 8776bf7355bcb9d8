//! Core data model definitions shared across Lectern crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod enrollment;
pub mod ids;
pub mod prelude;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{Course, CourseStatus, Lecture, Section};
pub use enrollment::Enrollment;
pub use ids::{CourseId, EnrollmentId, LectureId, SectionId, UserId};
pub use watch::{LectureWatchState, WatchedProgress};
