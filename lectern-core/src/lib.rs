//! # Lectern Core
//!
//! Core library for the Lectern course platform: content-tree management,
//! enrollment gating, and watch-progress tracking.
//!
//! ## Overview
//!
//! - **Catalog**: courses, sections, and lectures with dense per-parent
//!   ordering and cached duration rollups
//! - **Enrollment**: payment-driven access grants with a unique
//!   (user, course) constraint
//! - **Watch progress**: monotonic per-lecture tracking and derived
//!   completion percentages
//! - **Access gating**: free-preview lectures are open; everything else
//!   requires enrollment and fails closed
//!
//! ## Architecture
//!
//! - [`domain`]: pure decision logic (completion rules, reorder validation)
//! - [`database`]: repository ports and their Postgres implementations
//! - [`application`]: the unit-of-work façade and orchestrating services
//! - [`collaborators`]: interfaces to host-provided storage and
//!   notification services

pub mod application;
pub mod collaborators;
pub mod database;
pub mod domain;
pub mod error;

/// Embedded migrations, exposed so integration tests can run them against
/// a scratch database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use application::services::{
    AccessGate, CurriculumService, EnrollmentService, ProgressService,
};
pub use application::unit_of_work::AppUnitOfWork;
pub use database::{DatabaseContext, PostgresDatabase};
pub use error::{CoreError, Result};
