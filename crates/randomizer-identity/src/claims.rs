//! Access token claims

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Claims carried by a validated access token
///
/// Both strategies produce the same shape: the pool's RS256 tokens and the
/// local HS256 tokens are decoded into this struct, so handlers never need
/// to know which deployment they run under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Stable principal id
    pub sub: String,
    /// Username, when the token carries one
    #[serde(
        rename = "username",
        alias = "cognito:username",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    /// Space-delimited scope claim
    #[serde(default)]
    pub scope: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued-at (unix seconds)
    pub iat: i64,
}

impl TokenClaims {
    /// Split the scope claim into a set
    pub fn scopes(&self) -> HashSet<&str> {
        self.scope.split_whitespace().collect()
    }

    /// Check whether the token grants a scope
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().contains(scope)
    }
}

/// Token pair returned by a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(scope: &str) -> TokenClaims {
        TokenClaims {
            sub: "sub-1".to_string(),
            username: Some("alice".to_string()),
            scope: scope.to_string(),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn test_scope_splitting() {
        let c = claims("profile items");
        assert!(c.has_scope("profile"));
        assert!(c.has_scope("items"));
        assert!(!c.has_scope("admin"));
    }

    #[test]
    fn test_empty_scope_grants_nothing() {
        let c = claims("");
        assert!(c.scopes().is_empty());
        assert!(!c.has_scope("profile"));
    }

    #[test]
    fn test_provider_username_alias() {
        // The pool emits the username under its own claim name
        let json = r#"{"sub":"s","cognito:username":"alice","scope":"items","exp":1,"iat":1}"#;
        let c: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.username.as_deref(), Some("alice"));
    }
}
