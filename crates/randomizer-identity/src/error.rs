//! Identity error types
//!
//! Every failure mode of the hosted user pool is translated into one of
//! these variants before it leaves this crate. Callers map them onto HTTP
//! statuses; nothing provider-specific leaks past this boundary.

use thiserror::Error;

/// Result type alias for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity operation errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// An account with that username already exists in the pool
    #[error("Account already exists")]
    Conflict,

    /// No account with that username exists in the pool
    #[error("User not found")]
    NotFound,

    /// Account exists but has not completed confirmation
    #[error("Account not confirmed")]
    Unconfirmed,

    /// Username/password pair was rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Confirmation code does not match the expected value
    #[error("Confirmation code mismatch")]
    CodeMismatch,

    /// Confirmation code has expired
    #[error("Confirmation code expired")]
    ExpiredCode,

    /// Confirmation was attempted on an already-confirmed account
    #[error("Account already confirmed")]
    AlreadyConfirmed,

    /// Access token is syntactically malformed
    #[error("Malformed access token")]
    MalformedToken,

    /// Access token failed validation (signature, expiry, audience)
    #[error("Invalid access token")]
    InvalidToken,

    /// Token's key id is not present in the pool's published key set
    #[error("Signing key not found")]
    KeyNotFound,

    /// Provider throttled the request
    #[error("Rate limited by provider")]
    RateLimited,

    /// Provider call failed for a reason outside the known taxonomy
    #[error("Upstream identity provider error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_errors_collapse_to_invalid_token() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        assert!(matches!(IdentityError::from(err), IdentityError::InvalidToken));
    }

    #[test]
    fn test_display_is_provider_neutral() {
        // Error text must never echo raw provider exception names
        assert_eq!(IdentityError::Conflict.to_string(), "Account already exists");
        assert_eq!(IdentityError::CodeMismatch.to_string(), "Confirmation code mismatch");
    }
}
