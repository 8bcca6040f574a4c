//! Authentication middleware
//!
//! Validates a bearer token when one is present and stashes the claims and
//! the raw token in request extensions. Requests without credentials pass
//! through untouched; the extractors decide per route whether auth is
//! required. A token that is present but invalid fails here, before any
//! handler runs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Raw bearer string, kept for operations that forward the token upstream
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Validate bearer credentials and enrich the request
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers());

    if let Some(token) = token {
        match state.identity.validate_token(&token).await {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                req.extensions_mut().insert(BearerToken(token));
            }
            Err(err) => {
                tracing::debug!(error = %err, "Rejected bearer token");
                return ApiError::from(err).into_response();
            }
        }
    }

    next.run(req).await
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    #[test]
    fn test_bearer_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_non_bearer_schemes_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_empty_token_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }
}
