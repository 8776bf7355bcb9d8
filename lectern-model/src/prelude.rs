//! Convenience re-exports for downstream crates.

pub use crate::catalog::{Course, CourseStatus, Lecture, Section};
pub use crate::enrollment::Enrollment;
pub use crate::ids::{CourseId, EnrollmentId, LectureId, SectionId, UserId};
pub use crate::watch::{LectureWatchState, WatchedProgress};
