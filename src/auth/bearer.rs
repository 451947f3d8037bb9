// Bearer token extraction and redaction

use crate::core::errors::AdminError;
use axum::http::{header, HeaderMap};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use std::fmt;

/// Short SHA-256 fingerprint of a token, safe to put in logs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    const LEN: usize = 16;

    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(Self::LEN);
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller token wrapped so it cannot leak through logging
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(token: &str) -> Self {
        Self(Secret::new(token.to_string()))
    }

    /// Extract the token from an `Authorization: Bearer <token>` header.
    ///
    /// Missing header, a non-bearer scheme and an empty token are all
    /// `Unauthenticated`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AdminError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AdminError::Unauthenticated("Missing authorization header".to_string()))?;

        let value = value
            .to_str()
            .map_err(|_| AdminError::Unauthenticated("Invalid authorization header".to_string()))?;

        let (scheme, token) = value
            .split_once(' ')
            .ok_or_else(|| AdminError::Unauthenticated("Invalid authorization header".to_string()))?;

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AdminError::Unauthenticated("Invalid authorization header".to_string()));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(AdminError::Unauthenticated("Invalid authorization header".to_string()));
        }

        Ok(Self::new(token))
    }

    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint::from_token(self.expose_secret())
    }

    /// Expose the raw token (only for forwarding to the identity provider)
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}
