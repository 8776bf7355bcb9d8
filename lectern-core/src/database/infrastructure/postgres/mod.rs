pub mod repositories;

pub use repositories::{
    PostgresCatalogRepository, PostgresEnrollmentsRepository, PostgresWatchProgressRepository,
};
