use std::fmt;

use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Uses HS256 (HMAC with SHA-256). The handler holds no per-token state, so a
/// single instance can be shared across any number of concurrent requests.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Errors
    /// * `SigningFailed` - The secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::SigningFailed(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Sign claims into a JWT token.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a JWT token against the current time.
    ///
    /// See [`JwtHandler::decode_at`].
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a JWT token as of `now` (Unix seconds).
    ///
    /// The signature is checked before the payload is deserialized, and the
    /// expiry is checked only once the signature has been accepted.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match, or the header names
    ///   an algorithm other than HS256
    /// * `TokenExpired` - `now` is at or past the `exp` claim
    /// * `MalformedToken` - Token cannot be parsed into header, claims and signature
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below without leeway
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        JwtError::InvalidSignature
                    }
                    _ => JwtError::MalformedToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
