use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn delete_user<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::debug!(caller = %caller.user_id, user_id = %user_id, "Deleting user");

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
