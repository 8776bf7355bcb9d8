pub mod catalog;
pub mod enrollments;
pub mod watch_progress;

pub use catalog::PostgresCatalogRepository;
pub use enrollments::PostgresEnrollmentsRepository;
pub use watch_progress::PostgresWatchProgressRepository;
