//! Custom Axum extractors
//!
//! Auth requirements are expressed as extractor arguments: [`RequireAuth`]
//! for any authenticated principal, the `require_scope!`-generated guards
//! for scoped routes, and [`Bearer`] where the raw token itself is needed.
//! Missing credentials are reported before scope checks.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::middleware::BearerToken;

pub use randomizer_identity::TokenClaims;

/// Extractor for a required authenticated principal
pub struct RequireAuth(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::MissingCredentials.into_response())
    }
}

/// Extractor for the raw bearer string of an authenticated request
pub struct Bearer(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .map(|t| Bearer(t.0.clone()))
            .ok_or_else(|| ApiError::MissingCredentials.into_response())
    }
}

/// Macro to create scope requirement extractors
#[macro_export]
macro_rules! require_scope {
    ($name:ident, $scope:expr) => {
        pub struct $name(pub $crate::extractors::TokenClaims);

        #[axum::async_trait]
        impl<S> axum::extract::FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = axum::response::Response;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                _state: &S,
            ) -> Result<Self, Self::Rejection> {
                use axum::response::IntoResponse;

                let claims = parts
                    .extensions
                    .get::<$crate::extractors::TokenClaims>()
                    .cloned()
                    .ok_or_else(|| $crate::error::ApiError::MissingCredentials.into_response())?;

                if !claims.has_scope($scope) {
                    return Err($crate::error::ApiError::InsufficientScope.into_response());
                }

                Ok($name(claims))
            }
        }
    };
}

// Scoped guards for the two protected surfaces
require_scope!(RequireProfileScope, "profile");
require_scope!(RequireItemsScope, "items");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Request;

    fn claims(scope: &str) -> TokenClaims {
        TokenClaims {
            sub: "sub-1".to_string(),
            username: Some("alice".to_string()),
            scope: scope.to_string(),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        }
    }

    fn parts_with(claims: Option<TokenClaims>) -> Parts {
        let mut req = Request::new(axum::body::Body::empty());
        if let Some(c) = claims {
            req.extensions_mut().insert(c);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_require_auth_missing_credentials() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_with_claims() {
        let mut parts = parts_with(Some(claims("profile")));
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.ok().unwrap().0.sub, "sub-1");
    }

    #[tokio::test]
    async fn test_scope_guard_rejects_missing_scope() {
        let mut parts = parts_with(Some(claims("profile")));
        let result = RequireItemsScope::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_scope_guard_accepts_matching_scope() {
        let mut parts = parts_with(Some(claims("profile items")));
        assert!(RequireItemsScope::from_request_parts(&mut parts, &()).await.is_ok());
        let mut parts = parts_with(Some(claims("profile items")));
        assert!(RequireProfileScope::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_credentials_beats_scope_check() {
        // No claims at all: the guard reports missing auth, not missing scope
        let mut parts = parts_with(None);
        let result = RequireItemsScope::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Not authenticated");
    }
}
