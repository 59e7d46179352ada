use thiserror::Error;

/// Error type for JWT operations.
///
/// Messages never include the signing secret or the claims of a token whose
/// signature did not verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token validity window must be at least one second")]
    InvalidValidityWindow,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}
