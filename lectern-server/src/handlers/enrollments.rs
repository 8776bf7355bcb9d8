//! Enrollment lifecycle: payment-driven grants and admin revocation.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use lectern_model::{CourseId, EnrollmentId, UserId};

use crate::auth::AuthenticatedUser;
use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub progress: i32,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaymentCapturedRequest {
    pub course_id: CourseId,
}

/// POST /enrollments/payment-captured
///
/// Called after the payment provider confirms capture for the authenticated
/// learner. A re-delivered event hits the unique (user, course) constraint
/// and comes back as 409; the first grant is never re-applied.
pub async fn payment_captured(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<PaymentCapturedRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentResponse>)> {
    let enrollment = state
        .enrollment
        .enroll_on_payment_captured(user.id, req.course_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            progress: enrollment.progress,
            completed: enrollment.completed,
        }),
    ))
}

/// DELETE /admin/enrollments/{enrollment_id}
pub async fn revoke_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<EnrollmentId>,
) -> AppResult<StatusCode> {
    state.enrollment.revoke(enrollment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
