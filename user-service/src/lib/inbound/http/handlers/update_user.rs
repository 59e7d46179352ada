use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// HTTP request body for updating a user (raw JSON)
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<i16>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        // Validation happens here - errors are automatically converted via #[from]
        let username = self.username.map(Username::new).transpose()?;
        let email = self.email.map(EmailAddress::new).transpose()?;
        let password = self.password.map(Password::new).transpose()?;

        Ok(UpdateUserCommand {
            username,
            email,
            phone: self.phone,
            status: self.status,
            password,
        })
    }
}

pub async fn update_user<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let command = req.try_into_command()?;

    tracing::debug!(caller = %caller.user_id, user_id = %user_id, "Updating user");

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
