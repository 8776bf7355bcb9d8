//! Builders shared by the service unit tests.

use std::sync::Arc;

use chrono::Utc;

use lectern_model::{
    Course, CourseId, CourseStatus, Enrollment, EnrollmentId, Lecture, LectureId, Section,
    SectionId, UserId, WatchedProgress,
};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::ports::catalog::MockCatalogRepository;
use crate::database::ports::enrollments::MockEnrollmentsRepository;
use crate::database::ports::watch_progress::MockWatchProgressRepository;

pub fn uow_from_mocks(
    catalog: MockCatalogRepository,
    enrollments: MockEnrollmentsRepository,
    watch_progress: MockWatchProgressRepository,
) -> Arc<AppUnitOfWork> {
    Arc::new(AppUnitOfWork::from_parts(
        Arc::new(catalog),
        Arc::new(enrollments),
        Arc::new(watch_progress),
    ))
}

pub fn course(id: CourseId) -> Course {
    Course {
        id,
        title: "Practical Woodworking".to_string(),
        description: String::new(),
        status: CourseStatus::Published,
        total_hours: 0.0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn section(id: SectionId, course_id: CourseId, index: i32) -> Section {
    Section {
        id,
        course_id,
        title: format!("Section {index}"),
        description: String::new(),
        index,
        is_published: true,
        is_deleted: false,
        total_hours: 0.0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn lecture(id: LectureId, section_id: SectionId, index: i32, duration_seconds: i32) -> Lecture {
    Lecture {
        id,
        section_id,
        title: format!("Lecture {index}"),
        description: String::new(),
        storage_id: format!("vid-{index}"),
        duration_seconds,
        index,
        is_free_preview: false,
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn enrollment(id: EnrollmentId, user_id: UserId, course_id: CourseId) -> Enrollment {
    Enrollment {
        id,
        user_id,
        course_id,
        progress: 0,
        completed: false,
        last_lecture_id: None,
        enrolled_at: Utc::now(),
        last_accessed_at: Utc::now(),
    }
}

pub fn watched(
    user_id: UserId,
    course_id: CourseId,
    lecture_id: LectureId,
    watched_seconds: i32,
    is_completed: bool,
) -> WatchedProgress {
    WatchedProgress {
        user_id,
        course_id,
        lecture_id,
        watched_seconds,
        is_completed,
        updated_at: Utc::now(),
    }
}
