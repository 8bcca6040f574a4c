//! Identity configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted user-pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider region (e.g. "eu-central-1")
    pub region: String,
    /// User pool id (e.g. "eu-central-1_AbCdEfGhI")
    pub user_pool_id: String,
    /// App client id
    pub client_id: String,
    /// App client secret used for the request secret hash
    pub client_secret: String,
    /// Override for the provider endpoint (tests point this at a local stub)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout for provider calls
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// How long a fetched signing key set stays valid
    #[serde(with = "humantime_serde", default = "default_jwks_ttl")]
    pub jwks_ttl: Duration,
}

impl ProviderConfig {
    /// Endpoint for provider operations
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!("https://cognito-idp.{}.amazonaws.com/", self.region),
        }
    }

    /// URL of the pool's published signing key set
    pub fn jwks_url(&self) -> String {
        format!(
            "{}{}/.well-known/jwks.json",
            self.endpoint_url(),
            self.user_pool_id
        )
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-central-1".to_string()),
            user_pool_id: std::env::var("AWS_USER_POOL_ID").unwrap_or_default(),
            client_id: std::env::var("AWS_COGNITO_APP_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("AWS_COGNITO_APP_CLIENT_SECRET").unwrap_or_default(),
            endpoint: None,
            request_timeout: default_request_timeout(),
            jwks_ttl: default_jwks_ttl(),
        }
    }
}

/// Local JWT strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAuthConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Access token lifetime
    #[serde(with = "humantime_serde", default = "default_access_lifetime")]
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    #[serde(with = "humantime_serde", default = "default_refresh_lifetime")]
    pub refresh_token_lifetime: Duration,
}

impl Default for LocalAuthConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            access_token_lifetime: default_access_lifetime(),
            refresh_token_lifetime: default_refresh_lifetime(),
        }
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_jwks_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_access_lifetime() -> Duration {
    Duration::from_secs(3600)
}

fn default_refresh_lifetime() -> Duration {
    Duration::from_secs(604800)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let config = ProviderConfig {
            region: "eu-central-1".to_string(),
            user_pool_id: "eu-central-1_TestPool".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            endpoint: None,
            request_timeout: default_request_timeout(),
            jwks_ttl: default_jwks_ttl(),
        };

        assert_eq!(
            config.endpoint_url(),
            "https://cognito-idp.eu-central-1.amazonaws.com/"
        );
        assert_eq!(
            config.jwks_url(),
            "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_TestPool/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let config = ProviderConfig {
            endpoint: Some("http://localhost:9229/".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(config.endpoint_url(), "http://localhost:9229/");
    }
}
