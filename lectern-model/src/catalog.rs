//! Course content tree: Course -> Section -> Lecture.
//!
//! Children always reference their parent by id; the parent never stores a
//! child list. Sibling order is carried by a dense zero-based `index` over
//! the non-deleted rows of one parent.

use chrono::{DateTime, Utc};

use crate::ids::{CourseId, LectureId, SectionId};

/// Lifecycle status of a course in the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
        }
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CourseStatus::Draft),
            "published" => Ok(CourseStatus::Published),
            other => Err(format!("unknown course status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub status: CourseStatus,
    /// Derived cache: sum of `total_hours` over non-deleted sections.
    pub total_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub id: SectionId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    /// Dense zero-based position among the non-deleted sections of the course.
    pub index: i32,
    pub is_published: bool,
    pub is_deleted: bool,
    /// Derived cache: sum of lecture durations, in hours rounded to 2 decimals.
    pub total_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lecture {
    pub id: LectureId,
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    /// Opaque object-storage id. Signed playback URLs are derived on demand
    /// and never persisted.
    pub storage_id: String,
    /// Authoritative source of all hour rollups, in seconds.
    pub duration_seconds: i32,
    /// Dense zero-based position among the non-deleted lectures of the section.
    pub index: i32,
    pub is_free_preview: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lecture {
    /// Duration expressed in hours, rounded to two decimals.
    pub fn duration_hours(&self) -> f64 {
        (self.duration_seconds as f64 / 3600.0 * 100.0).round() / 100.0
    }
}
