use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Argon2id hash with the default cost parameters that no password matches.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$fEjKFp34/G18ITlz3fn/xg$xWk0FyIkK+2bTrUjMubhWNyJiYmHnonRJoGZnkuvumk";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Built once at startup from configuration and shared read-only afterwards.
#[derive(Debug)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_validity: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims encoded in `access_token`
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_validity` - Lifetime of every issued token
    ///
    /// # Errors
    /// * `SigningFailed` - The secret is empty
    /// * `InvalidValidityWindow` - The validity window is shorter than one second
    pub fn new(jwt_secret: &[u8], token_validity: Duration) -> Result<Self, JwtError> {
        if token_validity.num_seconds() <= 0 {
            return Err(JwtError::InvalidValidityWindow);
        }

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret)?,
            token_validity,
        })
    }

    /// Lifetime of the tokens this authenticator issues.
    pub fn token_validity(&self) -> Duration {
        self.token_validity
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate a JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject identifier written into the token
    /// * `username` - Subject name written into the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed or verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(user_id, username)?)
    }

    /// Reject a login for a user that does not exist.
    ///
    /// Runs one full verification against a hash that matches nothing, at the
    /// same cost as a wrong password for a real user.
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, UNKNOWN_USER_HASH);
        AuthenticationError::InvalidCredentials
    }

    /// Generate a JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        user_id: i64,
        username: &str,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::new(user_id, username, Utc::now(), self.token_validity)?;
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Validate and decode a JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Signature, expiry or structure check failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
