//! Shared wiring for handler tests: a TestServer over mocked repository
//! ports, plus entity builders and token helpers.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;

use lectern_core::application::unit_of_work::AppUnitOfWork;
use lectern_core::database::ports::catalog::MockCatalogRepository;
use lectern_core::database::ports::enrollments::MockEnrollmentsRepository;
use lectern_core::database::ports::watch_progress::MockWatchProgressRepository;
use lectern_model::{
    Course, CourseId, CourseStatus, Enrollment, EnrollmentId, Lecture, LectureId, Section,
    SectionId, UserId, WatchedProgress,
};

use lectern_server::auth::jwt::generate_token;
use lectern_server::build_app;
use lectern_server::collaborators::{LoggingNotifier, MediaUrlResolver};
use lectern_server::infra::app_state::AppState;
use lectern_server::infra::config::Config;

pub const TEST_SECRET: &str = "handler-test-secret";
pub const MEDIA_BASE: &str = "http://media.test";

pub fn test_config() -> Arc<Config> {
    Arc::new(Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        media_base_url: MEDIA_BASE.to_string(),
        cors_allowed_origin: None,
    })
}

pub fn build_test_server(
    catalog: MockCatalogRepository,
    enrollments: MockEnrollmentsRepository,
    watch_progress: MockWatchProgressRepository,
) -> TestServer {
    let unit_of_work = Arc::new(AppUnitOfWork::from_parts(
        Arc::new(catalog),
        Arc::new(enrollments),
        Arc::new(watch_progress),
    ));
    let state = AppState::new(
        unit_of_work,
        test_config(),
        Arc::new(MediaUrlResolver::new(MEDIA_BASE)),
        Arc::new(LoggingNotifier),
    );
    TestServer::new(build_app(state)).expect("test server should start")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn learner_token(user_id: UserId) -> String {
    generate_token(user_id.to_uuid(), "learner", TEST_SECRET).expect("token")
}

pub fn admin_token() -> String {
    generate_token(UserId::new().to_uuid(), "admin", TEST_SECRET).expect("token")
}

pub fn course(id: CourseId, status: CourseStatus) -> Course {
    Course {
        id,
        title: "Practical Woodworking".to_string(),
        description: "From rough lumber to furniture".to_string(),
        status,
        total_hours: 1.5,
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
        total_hours: 0.5,
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
