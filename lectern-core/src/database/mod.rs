//! Persistence layer: ports, the Postgres adapter, and the database context.

pub mod context;
pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use context::DatabaseContext;
pub use postgres::PostgresDatabase;
