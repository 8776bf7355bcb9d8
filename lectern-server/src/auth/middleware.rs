use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use lectern_model::UserId;

use super::jwt::validate_token;
use crate::errors::AppError;
use crate::infra::app_state::AppState;

/// Verified caller identity, inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub is_admin: bool,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = validate_token(&token, &state.config.jwt_secret)
        .map_err(|_| AppError::unauthorized("invalid or expired token"))?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: UserId::from(claims.sub),
        is_admin: claims.is_admin(),
    });
    Ok(next.run(request).await)
}

/// Like `auth_middleware` but lets anonymous requests through without an
/// identity; free-preview endpoints gate per lecture instead of per route.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(token) = extract_bearer_token(&request)
        && let Ok(claims) = validate_token(&token, &state.config.jwt_secret)
    {
        request.extensions_mut().insert(AuthenticatedUser {
            id: UserId::from(claims.sub),
            is_admin: claims.is_admin(),
        });
    }

    next.run(request).await
}

/// Must be layered after `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::unauthorized("authentication required"))?;

    if !user.is_admin {
        return Err(AppError::forbidden("admin access required"));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("malformed authorization header"))
}
