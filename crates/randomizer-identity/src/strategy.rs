//! Deployment auth strategy
//!
//! Exactly one strategy is active per deployment: either tokens are issued
//! and validated locally, or everything identity-related is delegated to the
//! hosted user pool. Both produce the same [`TokenClaims`], so the REST
//! layer is strategy-agnostic for validation and sign-out.

use crate::claims::TokenClaims;
use crate::config::{LocalAuthConfig, ProviderConfig};
use crate::error::IdentityResult;
use crate::jwks::TokenValidator;
use crate::local::LocalAuth;
use crate::provider::ProviderClient;

/// The active identity strategy
pub enum AuthStrategy {
    /// Local HS256 issuance against the mirror table's password hashes
    Local(LocalAuth),
    /// Full delegation to the hosted user pool
    Delegated {
        provider: ProviderClient,
        validator: TokenValidator,
    },
}

impl AuthStrategy {
    /// Build the local strategy
    pub fn local(config: LocalAuthConfig) -> Self {
        Self::Local(LocalAuth::new(config))
    }

    /// Build the delegated strategy
    pub fn delegated(config: &ProviderConfig) -> IdentityResult<Self> {
        Ok(Self::Delegated {
            provider: ProviderClient::new(config)?,
            validator: TokenValidator::new(config)?,
        })
    }

    /// Validate a bearer token with whichever strategy is active
    pub async fn validate_token(&self, token: &str) -> IdentityResult<TokenClaims> {
        match self {
            Self::Local(local) => local.validate(token),
            Self::Delegated { validator, .. } => validator.validate(token).await,
        }
    }

    /// Revoke the session behind an access token
    ///
    /// The bearer string a client still holds cannot be invalidated
    /// server-side; delegated sign-out revokes the upstream session, local
    /// sign-out is a no-op.
    pub async fn sign_out(&self, access_token: &str) -> IdentityResult<()> {
        match self {
            Self::Local(_) => Ok(()),
            Self::Delegated { provider, .. } => provider.global_sign_out(access_token).await,
        }
    }

    /// The pool client, when delegation is active
    pub fn provider(&self) -> Option<&ProviderClient> {
        match self {
            Self::Delegated { provider, .. } => Some(provider),
            Self::Local(_) => None,
        }
    }

    /// The local issuer, when the local strategy is active
    pub fn local_auth(&self) -> Option<&LocalAuth> {
        match self {
            Self::Local(local) => Some(local),
            Self::Delegated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_strategy() -> AuthStrategy {
        AuthStrategy::local(LocalAuthConfig {
            secret: "test-secret-key-at-least-32-bytes-long!!".to_string(),
            access_token_lifetime: Duration::from_secs(3600),
            refresh_token_lifetime: Duration::from_secs(604800),
        })
    }

    #[tokio::test]
    async fn test_local_validate_through_strategy() {
        let strategy = local_strategy();
        let local = strategy.local_auth().unwrap();
        let pair = local.issue_token_pair("sub-1", "alice").unwrap();

        let claims = strategy.validate_token(&pair.access_token).await.unwrap();
        assert_eq!(claims.sub, "sub-1");
    }

    #[tokio::test]
    async fn test_local_sign_out_is_noop() {
        let strategy = local_strategy();
        assert!(strategy.sign_out("anything").await.is_ok());
    }

    #[test]
    fn test_accessors_match_variant() {
        let strategy = local_strategy();
        assert!(strategy.local_auth().is_some());
        assert!(strategy.provider().is_none());
    }
}
