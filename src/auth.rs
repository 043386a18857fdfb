use crate::errors::FeedError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use std::fmt;

/// Bearer token of the authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

#[derive(Deserialize)]
struct Claims {
    id: String,
}

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the `id` claim from the JWT payload. The signature is not verified;
    /// the remote API remains the authority on the token.
    pub fn user_id(&self) -> Result<String, FeedError> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .ok_or_else(|| FeedError::InvalidToken("token is not a JWT".to_string()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| FeedError::InvalidToken(format!("payload is not base64url: {}", e)))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| FeedError::InvalidToken(format!("payload has no id claim: {}", e)))?;
        Ok(claims.id)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
