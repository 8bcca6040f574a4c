//! Local JWT strategy
//!
//! Pre-delegation deployments issue and validate HS256 tokens against a
//! local secret and verify Argon2id password hashes stored on the account
//! mirror row. Claims come out in the same shape as pool-issued tokens.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{TokenClaims, TokenPair};
use crate::config::LocalAuthConfig;
use crate::error::{IdentityError, IdentityResult};

/// Scopes granted to locally issued access tokens
const LOCAL_SCOPE: &str = "profile items";

/// Local token issuance and validation
#[derive(Clone)]
pub struct LocalAuth {
    config: LocalAuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl LocalAuth {
    /// Create a new local auth service
    pub fn new(config: LocalAuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Verify a password against the stored hash and issue a token pair
    pub fn sign_in(
        &self,
        sub: &str,
        username: &str,
        password: &str,
        stored_hash: &str,
    ) -> IdentityResult<TokenPair> {
        if !self.verify_password(password, stored_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }
        self.issue_token_pair(sub, username)
    }

    /// Issue an access/refresh token pair
    pub fn issue_token_pair(&self, sub: &str, username: &str) -> IdentityResult<TokenPair> {
        let now = Utc::now().timestamp();
        let access_exp = now + self.config.access_token_lifetime.as_secs() as i64;
        let refresh_exp = now + self.config.refresh_token_lifetime.as_secs() as i64;

        let access_claims = TokenClaims {
            sub: sub.to_string(),
            username: Some(username.to_string()),
            scope: LOCAL_SCOPE.to_string(),
            exp: access_exp,
            iat: now,
        };

        // Refresh tokens carry no scopes; they are only good for re-issuance
        let refresh_claims = TokenClaims {
            sub: sub.to_string(),
            username: Some(username.to_string()),
            scope: String::new(),
            exp: refresh_exp,
            iat: now,
        };

        let access_token = encode(&Header::default(), &access_claims, &self.encoding_key)
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.encoding_key)
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate an access token and return its claims
    pub fn validate(&self, token: &str) -> IdentityResult<TokenClaims> {
        let mut validation = Validation::default();
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Hash a password with Argon2id
    pub fn hash_password(&self, password: &str) -> IdentityResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> IdentityResult<bool> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| IdentityError::Upstream(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_auth() -> LocalAuth {
        LocalAuth::new(LocalAuthConfig {
            secret: "test-secret-key-at-least-32-bytes-long!!".to_string(),
            access_token_lifetime: Duration::from_secs(3600),
            refresh_token_lifetime: Duration::from_secs(604800),
        })
    }

    #[test]
    fn test_token_round_trip() {
        let auth = test_auth();
        let pair = auth.issue_token_pair("sub-1", "alice").unwrap();

        let claims = auth.validate(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "sub-1");
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert!(claims.has_scope("profile"));
        assert!(claims.has_scope("items"));
    }

    #[test]
    fn test_refresh_token_carries_no_scopes() {
        let auth = test_auth();
        let pair = auth.issue_token_pair("sub-1", "alice").unwrap();

        let claims = auth.validate(&pair.refresh_token).unwrap();
        assert!(claims.scopes().is_empty());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = test_auth();
        let other = LocalAuth::new(LocalAuthConfig {
            secret: "a-completely-different-signing-secret!!!".to_string(),
            access_token_lifetime: Duration::from_secs(3600),
            refresh_token_lifetime: Duration::from_secs(604800),
        });

        let pair = auth.issue_token_pair("sub-1", "alice").unwrap();
        assert!(matches!(
            other.validate(&pair.access_token),
            Err(IdentityError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = test_auth();
        assert!(matches!(
            auth.validate("not-a-token"),
            Err(IdentityError::InvalidToken)
        ));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let auth = test_auth();
        let hash = auth.hash_password("correct horse battery staple").unwrap();

        assert!(auth.verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!auth.verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_sign_in_rejects_wrong_password() {
        let auth = test_auth();
        let hash = auth.hash_password("hunter2hunter2").unwrap();

        let result = auth.sign_in("sub-1", "alice", "wrong", &hash);
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));

        let pair = auth.sign_in("sub-1", "alice", "hunter2hunter2", &hash).unwrap();
        assert!(!pair.access_token.is_empty());
    }
}
