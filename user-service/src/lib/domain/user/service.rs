use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuing
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Argon2 is CPU bound, so hashing runs on the blocking pool.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_and_issue(
        &self,
        password: Password,
        user: &User,
    ) -> Result<auth::AuthenticationResult, AuthenticationError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let user_id = user.id.0;
        let username = user.username.as_str().to_string();

        tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, user_id, &username)
        })
        .await
        .unwrap_or_else(|e| {
            Err(AuthenticationError::PasswordError(
                auth::PasswordError::HashingFailed(format!("Verification task failed: {}", e)),
            ))
        })
    }

    /// Same Argon2 cost as `verify_and_issue` for a username with no account.
    async fn reject_unknown_user(&self, password: Password) {
        let authenticator = Arc::clone(&self.authenticator);
        if let Err(e) = tokio::task::spawn_blocking(move || {
            authenticator.reject_unknown_user(password.expose())
        })
        .await
        {
            tracing::error!(error = %e, "Verification task failed");
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            phone: command.phone,
            password_hash,
            status: User::STATUS_ACTIVE,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let Some(mut user) = self.repository.find_by_username(&command.username).await? else {
            self.reject_unknown_user(command.password).await;
            tracing::info!("Authentication failed");
            return Err(UserError::InvalidCredentials);
        };

        let issued = self
            .verify_and_issue(command.password, &user)
            .await
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!("Authentication failed");
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => UserError::Password(err),
                AuthenticationError::JwtError(err) => UserError::Token(err),
            })?;

        let now = Utc::now();
        match self.repository.record_login(&user.id, now).await {
            Ok(()) => user.last_login_at = Some(now),
            Err(e) => tracing::error!(
                user_id = %user.id,
                error = %e,
                "Failed to record last login time"
            ),
        }

        let expires_at = DateTime::from_timestamp(issued.claims.exp, 0).ok_or_else(|| {
            UserError::Unknown(format!("Token expiry out of range: {}", issued.claims.exp))
        })?;

        tracing::info!(user_id = %user.id, "User authenticated");

        Ok(LoginOutcome {
            user,
            token: issued.access_token,
            expires_at,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_phone) = command.phone {
            user.phone = Some(new_phone);
        }

        if let Some(new_status) = command.status {
            user.status = new_status;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password).await?;
        }

        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
