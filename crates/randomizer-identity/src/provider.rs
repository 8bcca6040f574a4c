//! Hosted user-pool gateway
//!
//! Speaks the pool's JSON wire protocol: every operation is a POST to the
//! regional endpoint with an `X-Amz-Target` header naming the operation and
//! an `application/x-amz-json-1.1` body. Provider failures arrive as a
//! `__type` exception name, which is translated per operation into
//! [`IdentityError`] so nothing upstream-specific escapes.

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;

use crate::claims::TokenPair;
use crate::config::ProviderConfig;
use crate::error::{IdentityError, IdentityResult};
use crate::secret_hash::secret_hash;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService.";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Provider operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    SignUp,
    ConfirmSignUp,
    ResendConfirmationCode,
    InitiateAuth,
    GlobalSignOut,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::SignUp => "SignUp",
            Self::ConfirmSignUp => "ConfirmSignUp",
            Self::ResendConfirmationCode => "ResendConfirmationCode",
            Self::InitiateAuth => "InitiateAuth",
            Self::GlobalSignOut => "GlobalSignOut",
        }
    }
}

/// Outcome of a signup call
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    /// Pool-assigned principal id
    pub sub: String,
    /// Whether the pool auto-confirmed the account
    pub confirmed: bool,
}

/// Client for the hosted user pool
///
/// Constructed once with its own credentials and HTTP client; handlers reach
/// it through shared state rather than ambient globals.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl ProviderClient {
    /// Build a client from configuration
    pub fn new(config: &ProviderConfig) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(IdentityError::from)?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn secret_hash_for(&self, username: &str) -> String {
        secret_hash(username, &self.client_id, &self.client_secret)
    }

    /// Register a new account in the pool
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> IdentityResult<SignupOutcome> {
        let body = json!({
            "ClientId": self.client_id,
            "SecretHash": self.secret_hash_for(username),
            "Username": username,
            "Password": password,
            "UserAttributes": [
                { "Name": "email", "Value": email },
            ],
        });

        let value = self.call(Operation::SignUp, body).await?;
        let response: SignUpResponse =
            serde_json::from_value(value).map_err(|e| IdentityError::Upstream(e.to_string()))?;

        tracing::info!(username = %username, sub = %response.user_sub, "Account registered");

        Ok(SignupOutcome {
            sub: response.user_sub,
            confirmed: response.user_confirmed,
        })
    }

    /// Confirm a pending account with the emailed code
    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> IdentityResult<()> {
        let body = json!({
            "ClientId": self.client_id,
            "SecretHash": self.secret_hash_for(username),
            "Username": username,
            "ConfirmationCode": code,
        });

        self.call(Operation::ConfirmSignUp, body).await?;
        tracing::info!(username = %username, "Account confirmed");
        Ok(())
    }

    /// Re-send the confirmation code for a pending account
    pub async fn resend_confirmation_code(&self, username: &str) -> IdentityResult<()> {
        let body = json!({
            "ClientId": self.client_id,
            "SecretHash": self.secret_hash_for(username),
            "Username": username,
        });

        self.call(Operation::ResendConfirmationCode, body).await?;
        Ok(())
    }

    /// Exchange a username/password pair for tokens
    pub async fn initiate_auth(&self, username: &str, password: &str) -> IdentityResult<TokenPair> {
        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": {
                "USERNAME": username,
                "PASSWORD": password,
                "SECRET_HASH": self.secret_hash_for(username),
            },
        });

        let value = self.call(Operation::InitiateAuth, body).await?;
        let response: InitiateAuthResponse =
            serde_json::from_value(value).map_err(|e| IdentityError::Upstream(e.to_string()))?;

        let result = response
            .authentication_result
            .ok_or_else(|| IdentityError::Upstream("missing authentication result".to_string()))?;

        Ok(TokenPair {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
        })
    }

    /// Revoke every session behind an access token
    pub async fn global_sign_out(&self, access_token: &str) -> IdentityResult<()> {
        let body = json!({ "AccessToken": access_token });
        self.call(Operation::GlobalSignOut, body).await?;
        Ok(())
    }

    async fn call(
        &self,
        op: Operation,
        body: serde_json::Value,
    ) -> IdentityResult<serde_json::Value> {
        let payload =
            serde_json::to_vec(&body).map_err(|e| IdentityError::Upstream(e.to_string()))?;

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{}{}", TARGET_PREFIX, op.name()))
            .header(CONTENT_TYPE, AMZ_JSON)
            .body(payload)
            .send()
            .await?;

        if response.status().is_success() {
            let value = response.json().await.unwrap_or(serde_json::Value::Null);
            return Ok(value);
        }

        let error: ProviderErrorBody = response.json().await.unwrap_or_default();
        Err(translate(op, &error))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(rename = "UserSub")]
    user_sub: String,
    #[serde(rename = "UserConfirmed", default)]
    user_confirmed: bool,
}

#[derive(Debug, Deserialize)]
struct InitiateAuthResponse {
    #[serde(rename = "AuthenticationResult")]
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
struct AuthenticationResult {
    #[serde(rename = "AccessToken")]
    access_token: String,
    #[serde(rename = "RefreshToken")]
    refresh_token: String,
}

/// Translate a provider exception into the crate error taxonomy
///
/// Exception names sometimes arrive fully qualified
/// ("com.amazonaws...#UserNotFoundException"); only the final segment is
/// significant. `NotAuthorizedException` is overloaded by the provider and
/// means something different per operation.
fn translate(op: Operation, error: &ProviderErrorBody) -> IdentityError {
    let kind = error.kind.as_deref().unwrap_or("");
    let name = kind.rsplit('#').next().unwrap_or(kind);

    match name {
        "UsernameExistsException" => IdentityError::Conflict,
        "UserNotFoundException" => IdentityError::NotFound,
        "UserNotConfirmedException" => IdentityError::Unconfirmed,
        "CodeMismatchException" => IdentityError::CodeMismatch,
        "ExpiredCodeException" => IdentityError::ExpiredCode,
        "TooManyRequestsException" | "LimitExceededException" => IdentityError::RateLimited,
        "InvalidParameterException" if op == Operation::GlobalSignOut => {
            IdentityError::MalformedToken
        }
        "NotAuthorizedException" => match op {
            Operation::InitiateAuth => IdentityError::InvalidCredentials,
            Operation::ConfirmSignUp => IdentityError::AlreadyConfirmed,
            Operation::GlobalSignOut => IdentityError::InvalidToken,
            _ => IdentityError::Upstream(describe(name, error)),
        },
        _ => IdentityError::Upstream(describe(name, error)),
    }
}

fn describe(name: &str, error: &ProviderErrorBody) -> String {
    match &error.message {
        Some(message) => format!("{}: {}", name, message),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(kind: &str) -> ProviderErrorBody {
        ProviderErrorBody {
            kind: Some(kind.to_string()),
            message: Some("details".to_string()),
        }
    }

    #[test]
    fn test_translate_common_exceptions() {
        assert!(matches!(
            translate(Operation::SignUp, &body("UsernameExistsException")),
            IdentityError::Conflict
        ));
        assert!(matches!(
            translate(Operation::InitiateAuth, &body("UserNotFoundException")),
            IdentityError::NotFound
        ));
        assert!(matches!(
            translate(Operation::InitiateAuth, &body("UserNotConfirmedException")),
            IdentityError::Unconfirmed
        ));
        assert!(matches!(
            translate(Operation::ConfirmSignUp, &body("CodeMismatchException")),
            IdentityError::CodeMismatch
        ));
        assert!(matches!(
            translate(Operation::ConfirmSignUp, &body("ExpiredCodeException")),
            IdentityError::ExpiredCode
        ));
    }

    #[test]
    fn test_translate_strips_qualified_names() {
        let qualified = body("com.amazonaws.cognito.idp#UserNotFoundException");
        assert!(matches!(
            translate(Operation::InitiateAuth, &qualified),
            IdentityError::NotFound
        ));
    }

    #[test]
    fn test_not_authorized_depends_on_operation() {
        assert!(matches!(
            translate(Operation::InitiateAuth, &body("NotAuthorizedException")),
            IdentityError::InvalidCredentials
        ));
        assert!(matches!(
            translate(Operation::ConfirmSignUp, &body("NotAuthorizedException")),
            IdentityError::AlreadyConfirmed
        ));
        assert!(matches!(
            translate(Operation::GlobalSignOut, &body("NotAuthorizedException")),
            IdentityError::InvalidToken
        ));
    }

    #[test]
    fn test_sign_out_invalid_parameter_is_malformed_token() {
        assert!(matches!(
            translate(Operation::GlobalSignOut, &body("InvalidParameterException")),
            IdentityError::MalformedToken
        ));
    }

    #[test]
    fn test_throttling_maps_to_rate_limited() {
        assert!(matches!(
            translate(Operation::ResendConfirmationCode, &body("LimitExceededException")),
            IdentityError::RateLimited
        ));
        assert!(matches!(
            translate(Operation::GlobalSignOut, &body("TooManyRequestsException")),
            IdentityError::RateLimited
        ));
    }

    #[test]
    fn test_unknown_exception_is_upstream() {
        let err = translate(Operation::SignUp, &body("InternalErrorException"));
        match err {
            IdentityError::Upstream(detail) => {
                assert!(detail.contains("InternalErrorException"));
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_type_is_upstream() {
        let err = translate(Operation::SignUp, &ProviderErrorBody::default());
        assert!(matches!(err, IdentityError::Upstream(_)));
    }
}
