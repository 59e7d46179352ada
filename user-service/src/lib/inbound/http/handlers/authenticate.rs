use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

pub async fn authenticate<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    // A username that could never have been registered is just a wrong credential
    let username =
        Username::new(body.username).map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    let outcome = state
        .user_service
        .authenticate(LoginCommand {
            username,
            password: Password::presented(body.password),
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticateResponseData {
            user: (&outcome.user).into(),
            token: outcome.token,
            expires_at: outcome.expires_at,
        },
    ))
}

#[derive(Clone, Deserialize)]
pub struct AuthenticateRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub user: UserData,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
