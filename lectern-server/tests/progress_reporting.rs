//! Beacon ingestion, resume pointers, and the enrolled content view.

use axum::http::StatusCode;
use serde_json::{Value, json};

use lectern_core::database::ports::catalog::MockCatalogRepository;
use lectern_core::database::ports::enrollments::MockEnrollmentsRepository;
use lectern_core::database::ports::watch_progress::MockWatchProgressRepository;
use lectern_model::{CourseId, CourseStatus, EnrollmentId, LectureId, SectionId, UserId};

mod support;
use support::{
    bearer, build_test_server, course, enrollment, learner_token, lecture, section, watched,
};

#[tokio::test]
async fn progress_report_requires_a_token() {
    let server = build_test_server(
        MockCatalogRepository::new(),
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );

    let response = server
        .post(&format!(
            "/api/v1/user/courses/{}/lectures/{}/progress",
            CourseId::new(),
            LectureId::new()
        ))
        .json(&json!({ "watched_seconds": 30 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn negative_watched_seconds_is_a_bad_request() {
    let server = build_test_server(
        MockCatalogRepository::new(),
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );

    let response = server
        .post(&format!(
            "/api/v1/user/courses/{}/lectures/{}/progress",
            CourseId::new(),
            LectureId::new()
        ))
        .add_header("Authorization", bearer(&learner_token(UserId::new())))
        .json(&json!({ "watched_seconds": -10 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn mid_lecture_beacon_returns_stored_state() {
    let user_id = UserId::new();
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let lecture_id = LectureId::new();

    let mut catalog = MockCatalogRepository::new();
    let l = lecture(lecture_id, section_id, 0, 600);
    catalog
        .expect_get_lecture()
        .returning(move |_| Ok(Some(l.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_get_section()
        .returning(move |_| Ok(Some(s.clone())));

    let mut enrollments = MockEnrollmentsRepository::new();
    let e = enrollment(EnrollmentId::new(), user_id, course_id);
    enrollments
        .expect_get()
        .returning(move |_, _| Ok(Some(e.clone())));
    enrollments
        .expect_touch_last_access()
        .times(1)
        .returning(|_, _| Ok(()));

    let mut watch = MockWatchProgressRepository::new();
    watch
        .expect_upsert_monotonic()
        .returning(move |u, c, l, secs, done| Ok(watched(u, c, l, secs, done)));

    let server = build_test_server(catalog, enrollments, watch);
    let response = server
        .post(&format!(
            "/api/v1/user/courses/{course_id}/lectures/{lecture_id}/progress"
        ))
        .add_header("Authorization", bearer(&learner_token(user_id)))
        .json(&json!({ "watched_seconds": 120 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["watched_seconds"], 120);
    assert_eq!(body["is_completed"], false);
    assert_eq!(body["newly_completed"], false);
    assert_eq!(body["course_progress"], 0);
}

#[tokio::test]
async fn beacon_accepts_original_wire_keys() {
    let user_id = UserId::new();
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let lecture_id = LectureId::new();

    let mut catalog = MockCatalogRepository::new();
    let l = lecture(lecture_id, section_id, 0, 600);
    catalog
        .expect_get_lecture()
        .returning(move |_| Ok(Some(l.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_get_section()
        .returning(move |_| Ok(Some(s.clone())));

    let mut enrollments = MockEnrollmentsRepository::new();
    let e = enrollment(EnrollmentId::new(), user_id, course_id);
    enrollments
        .expect_get()
        .returning(move |_, _| Ok(Some(e.clone())));
    enrollments
        .expect_touch_last_access()
        .returning(|_, _| Ok(()));

    let mut watch = MockWatchProgressRepository::new();
    watch
        .expect_upsert_monotonic()
        .withf(|_, _, _, secs, done| *secs == 90 && !*done)
        .times(1)
        .returning(move |u, c, l, secs, done| Ok(watched(u, c, l, secs, done)));

    let server = build_test_server(catalog, enrollments, watch);
    let response = server
        .post(&format!(
            "/api/v1/user/courses/{course_id}/lectures/{lecture_id}/progress"
        ))
        .add_header("Authorization", bearer(&learner_token(user_id)))
        .json(&json!({ "watchedDuration": 90, "isLectureCompleted": false }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["watched_seconds"], 90);
}

#[tokio::test]
async fn unenrolled_beacon_is_forbidden() {
    let mut enrollments = MockEnrollmentsRepository::new();
    enrollments.expect_get().returning(|_, _| Ok(None));

    let server = build_test_server(
        MockCatalogRepository::new(),
        enrollments,
        MockWatchProgressRepository::new(),
    );
    let response = server
        .post(&format!(
            "/api/v1/user/courses/{}/lectures/{}/progress",
            CourseId::new(),
            LectureId::new()
        ))
        .add_header("Authorization", bearer(&learner_token(UserId::new())))
        .json(&json!({ "watched_seconds": 30 }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn resume_points_at_last_active_lecture() {
    let user_id = UserId::new();
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let lecture_id = LectureId::new();

    let mut enrollments = MockEnrollmentsRepository::new();
    let mut e = enrollment(EnrollmentId::new(), user_id, course_id);
    e.progress = 40;
    e.last_lecture_id = Some(lecture_id);
    enrollments
        .expect_get()
        .returning(move |_, _| Ok(Some(e.clone())));

    let mut catalog = MockCatalogRepository::new();
    let l = lecture(lecture_id, section_id, 2, 600);
    catalog
        .expect_get_lecture()
        .returning(move |_| Ok(Some(l.clone())));

    let mut watch = MockWatchProgressRepository::new();
    watch
        .expect_get()
        .returning(move |u, c, l| Ok(Some(watched(u, c, l, 250, false))));

    let server = build_test_server(catalog, enrollments, watch);
    let response = server
        .get(&format!("/api/v1/user/courses/{course_id}/resume"))
        .add_header("Authorization", bearer(&learner_token(user_id)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["lecture_id"], lecture_id.to_string());
    assert_eq!(body["watched_seconds"], 250);
    assert_eq!(body["progress"], 40);
}

#[tokio::test]
async fn resume_drops_deleted_lecture_pointer() {
    let user_id = UserId::new();
    let course_id = CourseId::new();
    let lecture_id = LectureId::new();

    let mut enrollments = MockEnrollmentsRepository::new();
    let mut e = enrollment(EnrollmentId::new(), user_id, course_id);
    e.last_lecture_id = Some(lecture_id);
    enrollments
        .expect_get()
        .returning(move |_, _| Ok(Some(e.clone())));

    let mut catalog = MockCatalogRepository::new();
    let mut l = lecture(lecture_id, SectionId::new(), 0, 600);
    l.is_deleted = true;
    catalog
        .expect_get_lecture()
        .returning(move |_| Ok(Some(l.clone())));

    let server = build_test_server(catalog, enrollments, MockWatchProgressRepository::new());
    let response = server
        .get(&format!("/api/v1/user/courses/{course_id}/resume"))
        .add_header("Authorization", bearer(&learner_token(user_id)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body.get("lecture_id").is_none());
}

#[tokio::test]
async fn content_view_reports_per_section_progress() {
    let user_id = UserId::new();
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let enrollment_id = EnrollmentId::new();
    let done_id = LectureId::new();
    let pending_id = LectureId::new();

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_active_sections()
        .returning(move |_| Ok(vec![s.clone()]));
    let listing = vec![
        lecture(done_id, section_id, 0, 300),
        lecture(pending_id, section_id, 1, 300),
    ];
    catalog
        .expect_active_lectures()
        .returning(move |_| Ok(listing.clone()));

    let mut enrollments = MockEnrollmentsRepository::new();
    let mut e = enrollment(enrollment_id, user_id, course_id);
    e.progress = 50;
    enrollments
        .expect_get()
        .returning(move |_, _| Ok(Some(e.clone())));
    enrollments
        .expect_completed_lecture_ids()
        .returning(move |_| Ok(vec![done_id]));

    let server = build_test_server(catalog, enrollments, MockWatchProgressRepository::new());
    let response = server
        .get(&format!("/api/v1/user/courses/{course_id}/content"))
        .add_header("Authorization", bearer(&learner_token(user_id)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["progress"], 50);
    assert_eq!(body["sections"][0]["progress"], 50);
    assert_eq!(body["completed_lecture_ids"][0], done_id.to_string());
}
