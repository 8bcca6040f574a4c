//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use randomizer_db::DbUser;

/// Signup request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Signup response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    /// Confirmation message
    pub message: String,
    /// Pool-assigned principal id
    pub sub: String,
}

/// Sign-in form (form-encoded, OAuth2 password grant shape)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token pair response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
}

/// Account verification request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub username: String,
    /// Code from the confirmation email
    #[validate(length(min = 1, message = "Confirmation code must not be empty"))]
    pub confirmation_code: String,
}

/// Query parameters for re-sending a confirmation code
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResendQuery {
    pub username: String,
}

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for UserResponse {
    fn from(user: DbUser) -> Self {
        Self {
            sub: user.sub,
            username: user.username,
            email: user.email,
            enabled: user.enabled,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        assert!(request.validate().is_err());

        let request = SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "a-long-enough-password".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_token_response_serializes_camel_case() {
        let response = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: "bearer".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert_eq!(json["tokenType"], "bearer");
    }

    #[test]
    fn test_verify_request_accepts_camel_case() {
        let json = r#"{"username":"alice","confirmationCode":"123456"}"#;
        let request: VerifyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.confirmation_code, "123456");
    }
}
