//! Repository ports consumed by application services.
//!
//! Implementations live under `database::infrastructure::postgres`; handler
//! tests substitute mock implementations (feature `mocks`).

pub mod catalog;
pub mod enrollments;
pub mod watch_progress;

pub use catalog::{CatalogRepository, LectureUpdate, NewCourse, NewLecture, NewSection};
pub use enrollments::EnrollmentsRepository;
pub use watch_progress::WatchProgressRepository;
