//! Pool token validation against the published signing key set
//!
//! Access tokens issued by the pool are RS256-signed. The pool publishes its
//! public keys as a JWKS document; validation selects the key named by the
//! token's `kid` header, verifies the signature and expiry, and checks the
//! audience against the app client id.
//!
//! The key set is cached for a short TTL. A `kid` miss against a fresh cache
//! forces one refetch before failing, so key rotation is picked up without
//! restarting.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::claims::TokenClaims;
use crate::config::ProviderConfig;
use crate::error::{IdentityError, IdentityResult};

/// One published signing key
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    /// RSA modulus (base64url)
    pub n: String,
    /// RSA exponent (base64url)
    pub e: String,
}

/// The pool's key set document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}

struct CachedKeys {
    fetched_at: Instant,
    keys: Jwks,
}

/// Validates pool-issued access tokens
pub struct TokenValidator {
    http: reqwest::Client,
    jwks_url: String,
    client_id: String,
    ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl TokenValidator {
    /// Build a validator from configuration
    pub fn new(config: &ProviderConfig) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(IdentityError::from)?;

        Ok(Self {
            http,
            jwks_url: config.jwks_url(),
            client_id: config.client_id.clone(),
            ttl: config.jwks_ttl,
            cache: RwLock::new(None),
        })
    }

    /// Validate an access token and return its claims
    pub async fn validate(&self, token: &str) -> IdentityResult<TokenClaims> {
        let header = decode_header(token).map_err(|_| IdentityError::InvalidToken)?;
        let kid = header.kid.ok_or(IdentityError::InvalidToken)?;

        let jwk = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|_| IdentityError::InvalidToken)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);

        let data = decode::<TokenClaims>(token, &decoding_key, &validation)?;
        Ok(data.claims)
    }

    async fn key_for(&self, kid: &str) -> IdentityResult<Jwk> {
        if let Some(jwk) = self.cached_key(kid).await {
            return Ok(jwk);
        }

        // Unknown kid or stale cache: refetch once before giving up
        let keys = self.fetch_keys().await?;
        let jwk = keys.find(kid).cloned();

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            fetched_at: Instant::now(),
            keys,
        });

        jwk.ok_or(IdentityError::KeyNotFound)
    }

    async fn cached_key(&self, kid: &str) -> Option<Jwk> {
        let cache = self.cache.read().await;
        let cached = cache.as_ref()?;
        if cached.fetched_at.elapsed() > self.ttl {
            return None;
        }
        cached.keys.find(kid).cloned()
    }

    async fn fetch_keys(&self) -> IdentityResult<Jwks> {
        tracing::debug!(url = %self.jwks_url, "Fetching signing key set");
        let keys: Jwks = self.http.get(&self.jwks_url).send().await?.json().await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwk(kid: &str) -> Jwk {
        Jwk {
            kid: kid.to_string(),
            kty: "RSA".to_string(),
            n: "AQAB".to_string(),
            e: "AQAB".to_string(),
        }
    }

    #[test]
    fn test_key_selection() {
        let jwks = Jwks {
            keys: vec![jwk("key-1"), jwk("key-2")],
        };

        assert!(jwks.find("key-2").is_some());
        assert!(jwks.find("key-3").is_none());
    }

    #[tokio::test]
    async fn test_tokens_without_kid_are_rejected() {
        let config = ProviderConfig {
            region: "eu-central-1".to_string(),
            user_pool_id: "eu-central-1_Test".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            endpoint: None,
            request_timeout: Duration::from_secs(1),
            jwks_ttl: Duration::from_secs(60),
        };
        let validator = TokenValidator::new(&config).unwrap();

        // Not a JWT at all; fails before any network access
        let result = validator.validate("not-a-token").await;
        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }
}
