use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::auth::middleware::{admin_middleware, auth_middleware, optional_auth_middleware};
use crate::handlers::{admin, catalog, enrollments, progress};
use crate::infra::app_state::AppState;

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create_public_routes(state.clone()))
        .merge(create_learner_routes(state.clone()))
        .merge(create_admin_routes(state))
}

/// Catalog browsing: open to anonymous callers, enriched when a token is
/// presented.
fn create_public_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{course_id}/sections",
            get(catalog::get_course_sections),
        )
        .route(
            "/courses/{course_id}/lectures/{lecture_id}",
            get(catalog::get_lecture),
        )
        .layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ))
}

/// Routes that require an authenticated learner.
fn create_learner_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/user/courses/{course_id}/content",
            get(progress::get_course_content),
        )
        .route(
            "/user/courses/{course_id}/resume",
            get(progress::get_resume),
        )
        .route(
            "/user/courses/{course_id}/lectures/{lecture_id}/progress",
            post(progress::report_progress),
        )
        .route(
            "/enrollments/payment-captured",
            post(enrollments::payment_captured),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Curriculum management; authenticated and admin-gated.
fn create_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/courses", post(admin::create_course))
        .route(
            "/admin/courses/{course_id}/status",
            put(admin::set_course_status),
        )
        .route(
            "/admin/courses/{course_id}/sections",
            post(admin::create_section),
        )
        .route(
            "/admin/courses/{course_id}/sections/reorder",
            patch(admin::reorder_sections),
        )
        .route(
            "/admin/courses/{course_id}/sections/{section_id}",
            put(admin::update_section).delete(admin::delete_section),
        )
        .route(
            "/admin/courses/{course_id}/sections/{section_id}/lectures",
            post(admin::create_lecture),
        )
        .route(
            "/admin/courses/{course_id}/sections/{section_id}/lectures/reorder",
            patch(admin::reorder_lectures),
        )
        .route(
            "/admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}",
            put(admin::update_lecture).delete(admin::delete_lecture),
        )
        .route(
            "/admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}/toggle-preview",
            patch(admin::toggle_free_preview),
        )
        .route(
            "/admin/enrollments/{enrollment_id}",
            delete(enrollments::revoke_enrollment),
        )
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
