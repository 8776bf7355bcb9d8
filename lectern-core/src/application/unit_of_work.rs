use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::ports::{
    catalog::CatalogRepository, enrollments::EnrollmentsRepository,
    watch_progress::WatchProgressRepository,
};
use crate::database::postgres::PostgresDatabase;
use crate::database::infrastructure::postgres::{
    PostgresCatalogRepository, PostgresEnrollmentsRepository, PostgresWatchProgressRepository,
};

/// Aggregates the repository ports used by application services.
///
/// Handlers and services take this composition-based façade instead of a
/// monolithic database interface; tests swap in mock ports field by field.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub catalog: Arc<dyn CatalogRepository>,
    pub enrollments: Arc<dyn EnrollmentsRepository>,
    pub watch_progress: Arc<dyn WatchProgressRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .field("enrollments", &type_name_of_val(self.enrollments.as_ref()))
            .field(
                "watch_progress",
                &type_name_of_val(self.watch_progress.as_ref()),
            )
            .finish()
    }
}

impl AppUnitOfWork {
    /// Compose the default Postgres-backed unit of work.
    pub fn from_postgres(postgres: Arc<PostgresDatabase>) -> Self {
        let pool = postgres.pool().clone();
        Self {
            catalog: Arc::new(PostgresCatalogRepository::new(pool.clone())),
            enrollments: Arc::new(PostgresEnrollmentsRepository::new(pool.clone())),
            watch_progress: Arc::new(PostgresWatchProgressRepository::new(pool)),
        }
    }

    /// Compose a unit of work from explicit ports (used by tests).
    pub fn from_parts(
        catalog: Arc<dyn CatalogRepository>,
        enrollments: Arc<dyn EnrollmentsRepository>,
        watch_progress: Arc<dyn WatchProgressRepository>,
    ) -> Self {
        Self {
            catalog,
            enrollments,
            watch_progress,
        }
    }
}
