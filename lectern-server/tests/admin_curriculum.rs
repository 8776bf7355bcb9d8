//! Admin curriculum routes: role gating, ordering rules, and enrollment
//! lifecycle.

use axum::http::StatusCode;
use serde_json::{Value, json};

use lectern_core::database::ports::catalog::MockCatalogRepository;
use lectern_core::database::ports::enrollments::MockEnrollmentsRepository;
use lectern_core::database::ports::watch_progress::MockWatchProgressRepository;
use lectern_model::{
    CourseId, CourseStatus, EnrollmentId, LectureId, SectionId, UserId,
};

mod support;
use support::{
    admin_token, bearer, build_test_server, course, enrollment, learner_token, lecture, section,
};

fn empty_server() -> axum_test::TestServer {
    build_test_server(
        MockCatalogRepository::new(),
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    )
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers() {
    let server = empty_server();
    let response = server
        .post("/api/v1/admin/courses")
        .json(&json!({ "title": "New Course" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_learner_tokens() {
    let server = empty_server();
    let response = server
        .post("/api/v1/admin/courses")
        .add_header("Authorization", bearer(&learner_token(UserId::new())))
        .json(&json!({ "title": "New Course" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn course_creation_returns_created_draft() {
    let mut catalog = MockCatalogRepository::new();
    catalog
        .expect_create_course()
        .withf(|new| new.title == "Joinery Basics")
        .times(1)
        .returning(|new| {
            let mut c = course(CourseId::new(), CourseStatus::Draft);
            c.title = new.title;
            c.description = new.description;
            c.total_hours = 0.0;
            Ok(c)
        });

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .post("/api/v1/admin/courses")
        .add_header("Authorization", bearer(&admin_token()))
        .json(&json!({ "title": "Joinery Basics" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["status"], "draft");
    assert_eq!(body["title"], "Joinery Basics");
}

#[tokio::test]
async fn section_reorder_with_wrong_set_is_rejected() {
    let course_id = CourseId::new();
    let (a, b) = (SectionId::new(), SectionId::new());

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));
    let listing = vec![section(a, course_id, 0), section(b, course_id, 1)];
    catalog
        .expect_active_sections()
        .returning(move |_| Ok(listing.clone()));
    catalog.expect_apply_section_order().times(0);

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .patch(&format!("/api/v1/admin/courses/{course_id}/sections/reorder"))
        .add_header("Authorization", bearer(&admin_token()))
        .json(&json!({ "ordered_ids": [a, SectionId::new()] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn section_reorder_accepts_original_wire_key() {
    let course_id = CourseId::new();
    let (a, b) = (SectionId::new(), SectionId::new());

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));

    let before = vec![section(a, course_id, 0), section(b, course_id, 1)];
    let after = vec![section(b, course_id, 0), section(a, course_id, 1)];
    let mut listings = vec![before, after].into_iter();
    catalog
        .expect_active_sections()
        .times(2)
        .returning(move |_| Ok(listings.next().unwrap()));
    catalog
        .expect_apply_section_order()
        .withf(move |_, ids| ids == &[b, a])
        .times(1)
        .returning(|_, _| Ok(()));

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .patch(&format!("/api/v1/admin/courses/{course_id}/sections/reorder"))
        .add_header("Authorization", bearer(&admin_token()))
        .json(&json!({ "orderedSectionIds": [b, a] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body[0]["id"], b.to_string());
    assert_eq!(body[1]["id"], a.to_string());
}

#[tokio::test]
async fn lecture_reorder_applies_and_returns_new_listing() {
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let (a, b) = (LectureId::new(), LectureId::new());

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_get_section()
        .returning(move |_| Ok(Some(s.clone())));

    let before = vec![lecture(a, section_id, 0, 300), lecture(b, section_id, 1, 300)];
    let after = vec![lecture(b, section_id, 0, 300), lecture(a, section_id, 1, 300)];

    let mut listings = vec![before, after].into_iter();
    catalog
        .expect_active_lectures()
        .times(2)
        .returning(move |_| Ok(listings.next().unwrap()));
    catalog
        .expect_apply_lecture_order()
        .withf(move |_, ids| ids == &[b, a])
        .times(1)
        .returning(|_, _| Ok(()));

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .patch(&format!(
            "/api/v1/admin/courses/{course_id}/sections/{section_id}/lectures/reorder"
        ))
        .add_header("Authorization", bearer(&admin_token()))
        .json(&json!({ "ordered_ids": [b, a] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body[0]["id"], b.to_string());
    assert_eq!(body[1]["id"], a.to_string());
}

#[tokio::test]
async fn section_delete_is_soft_and_rolls_up_hours() {
    let course_id = CourseId::new();
    let section_id = SectionId::new();

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_get_section()
        .returning(move |_| Ok(Some(s.clone())));
    catalog
        .expect_soft_delete_section()
        .times(1)
        .returning(|_| Ok(()));
    catalog
        .expect_sum_active_section_hours()
        .returning(|_| Ok(1.0));
    catalog
        .expect_set_course_hours()
        .times(1)
        .returning(|_, _| Ok(()));

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .delete(&format!(
            "/api/v1/admin/courses/{course_id}/sections/{section_id}"
        ))
        .add_header("Authorization", bearer(&admin_token()))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn preview_toggle_returns_flipped_lecture() {
    let course_id = CourseId::new();
    let section_id = SectionId::new();
    let lecture_id = LectureId::new();

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));
    let s = section(section_id, course_id, 0);
    catalog
        .expect_get_section()
        .returning(move |_| Ok(Some(s.clone())));
    let l = lecture(lecture_id, section_id, 0, 300);
    catalog
        .expect_get_lecture()
        .returning(move |_| Ok(Some(l.clone())));
    catalog
        .expect_toggle_free_preview()
        .times(1)
        .returning(move |id| {
            let mut flipped = lecture(id, section_id, 0, 300);
            flipped.is_free_preview = true;
            Ok(flipped)
        });

    let server = build_test_server(
        catalog,
        MockEnrollmentsRepository::new(),
        MockWatchProgressRepository::new(),
    );
    let response = server
        .patch(&format!(
            "/api/v1/admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}/toggle-preview"
        ))
        .add_header("Authorization", bearer(&admin_token()))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["is_free_preview"], true);
}

#[tokio::test]
async fn duplicate_payment_capture_is_a_conflict() {
    let course_id = CourseId::new();
    let user_id = UserId::new();

    let mut catalog = MockCatalogRepository::new();
    let c = course(course_id, CourseStatus::Published);
    catalog
        .expect_get_course()
        .returning(move |_| Ok(Some(c.clone())));

    let mut enrollments = MockEnrollmentsRepository::new();
    let mut created = false;
    enrollments.expect_create().returning(move |u, c| {
        if created {
            Err(lectern_core::CoreError::Conflict(
                "user is already enrolled".into(),
            ))
        } else {
            created = true;
            Ok(enrollment(EnrollmentId::new(), u, c))
        }
    });

    let server = build_test_server(catalog, enrollments, MockWatchProgressRepository::new());
    let token = learner_token(user_id);

    let first = server
        .post("/api/v1/enrollments/payment-captured")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "course_id": course_id }))
        .await;
    first.assert_status(StatusCode::CREATED);

    let second = server
        .post("/api/v1/enrollments/payment-captured")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "course_id": course_id }))
        .await;
    second.assert_status(StatusCode::CONFLICT);

    let body: Value = second.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn enrollment_revocation_requires_admin() {
    let enrollment_id = EnrollmentId::new();

    let mut enrollments = MockEnrollmentsRepository::new();
    let e = enrollment(enrollment_id, UserId::new(), CourseId::new());
    enrollments
        .expect_get_by_id()
        .returning(move |_| Ok(Some(e.clone())));
    enrollments.expect_delete().times(1).returning(|_| Ok(()));

    let server = build_test_server(
        MockCatalogRepository::new(),
        enrollments,
        MockWatchProgressRepository::new(),
    );

    let denied = server
        .delete(&format!("/api/v1/admin/enrollments/{enrollment_id}"))
        .add_header("Authorization", bearer(&learner_token(UserId::new())))
        .await;
    denied.assert_status(StatusCode::FORBIDDEN);

    let revoked = server
        .delete(&format!("/api/v1/admin/enrollments/{enrollment_id}"))
        .add_header("Authorization", bearer(&admin_token()))
        .await;
    revoked.assert_status(StatusCode::NO_CONTENT);
}
