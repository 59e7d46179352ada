use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Why the gate refused a request.
///
/// Kept for the logs only: every variant produces the same 401 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingCredentials,
    MalformedCredentials,
    InvalidCredentials(JwtError),
}

impl AuthRejection {
    fn reason(&self) -> &'static str {
        match self {
            AuthRejection::MissingCredentials => "missing_credentials",
            AuthRejection::MalformedCredentials => "malformed_credentials",
            AuthRejection::InvalidCredentials(JwtError::TokenExpired) => "token_expired",
            AuthRejection::InvalidCredentials(JwtError::InvalidSignature) => "invalid_signature",
            AuthRejection::InvalidCredentials(_) => "invalid_token",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::Unauthorized("Unauthorized".to_string()).into_response()
    }
}

/// Middleware that validates bearer tokens and adds user info to request extensions
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let user = verify_request(&authenticator, req.headers()).map_err(|rejection| {
        tracing::warn!(
            reason = rejection.reason(),
            method = %req.method(),
            uri = %req.uri(),
            "Request rejected by authentication gate"
        );
        rejection
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Resolve the caller's identity from the `Authorization` header.
pub fn verify_request(
    authenticator: &Authenticator,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthRejection> {
    let token = extract_token_from_header(headers)?;

    let claims = authenticator
        .validate_token(token)
        .map_err(AuthRejection::InvalidCredentials)?;

    Ok(AuthenticatedUser {
        user_id: UserId(claims.user_id),
        username: claims.username,
    })
}

/// Expects exactly `Bearer <token>`.
fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthRejection::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthRejection::MalformedCredentials)?;

    let mut parts = auth_str.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthRejection::MalformedCredentials),
    }
}
