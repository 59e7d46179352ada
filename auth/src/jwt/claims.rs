use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// Serialized as a flat JSON object: `user_id`, `username`, `iat` and `exp`
/// (the last two are Unix timestamps in seconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Primary key of the authenticated user
    pub user_id: i64,

    /// Username at the time the token was issued
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `validity` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username of the subject
    /// * `issued_at` - Issue instant, truncated to whole seconds
    /// * `validity` - How long the token stays valid
    ///
    /// # Errors
    /// * `InvalidValidityWindow` - `validity` is shorter than one second, which
    ///   would produce `exp <= iat`
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Result<Self, JwtError> {
        let window = validity.num_seconds();
        if window <= 0 {
            return Err(JwtError::InvalidValidityWindow);
        }

        let iat = issued_at.timestamp();
        Ok(Self {
            user_id,
            username: username.into(),
            iat,
            exp: iat + window,
        })
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is valid strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
