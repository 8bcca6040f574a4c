//! User handlers
//!
//! Signup, confirmation and sign-in orchestrate the active identity
//! strategy; the database only mirrors what the pool already decided.
//! Per-endpoint detail strings differ for the same underlying identity
//! error (a missing user reads differently on login than on verify), so
//! each handler refines the generic conversion where needed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use randomizer_identity::{AuthStrategy, IdentityError};

use crate::dto::{
    DetailResponse, LoginForm, ResendQuery, SignupRequest, SignupResponse, TokenResponse,
    UserResponse, VerifyRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Bearer, RequireProfileScope};
use crate::state::AppState;

/// Register a new account
///
/// Under delegation the pool is asked first; the mirror row is only written
/// once the pool accepted the username, so a conflict never leaves a
/// half-registered local row behind.
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Account already exists")
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let sub = match state.identity.as_ref() {
        AuthStrategy::Delegated { provider, .. } => {
            let outcome = provider
                .sign_up(&request.username, &request.email, &request.password)
                .await?;
            outcome.sub
        }
        AuthStrategy::Local(_) => Uuid::new_v4().to_string(),
    };

    let user = state
        .db
        .user_repo()
        .create(&sub, &request.username, &request.email)
        .await?;

    // Local accounts keep their hash on the freshly created row
    if let AuthStrategy::Local(local) = state.identity.as_ref() {
        let hash = local.hash_password(&request.password)?;
        state.db.user_repo().set_password_hash(&user.sub, &hash).await?;
    }

    tracing::info!(username = %request.username, sub = %user.sub, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            sub: user.sub,
        }),
    ))
}

/// Look up a user by principal id
#[utoipa::path(
    get,
    path = "/users/{sub}",
    tag = "Users",
    params(
        ("sub" = String, Path, description = "Principal id")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(sub): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .db
        .user_repo()
        .find_by_sub(&sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Sign in with username and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Account is disabled"),
        (status = 401, description = "Incorrect username or password"),
        (status = 403, description = "Account not confirmed"),
        (status = 404, description = "User does not exist")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = match state.identity.as_ref() {
        AuthStrategy::Delegated { provider, .. } => provider
            .initiate_auth(&form.username, &form.password)
            .await
            .map_err(|e| match e {
                IdentityError::NotFound => ApiError::NotFound("User does not exist".to_string()),
                other => ApiError::from(other),
            })?,
        AuthStrategy::Local(local) => {
            let user = state
                .db
                .user_repo()
                .find_by_username(&form.username)
                .await?
                .ok_or_else(|| ApiError::NotFound("User does not exist".to_string()))?;

            if !user.enabled {
                return Err(ApiError::Validation("Inactive user".to_string()));
            }

            let hash = user.password_hash.ok_or(ApiError::InvalidCredentials)?;
            local.sign_in(&user.sub, &user.username, &form.password, &hash)?
        }
    };

    Ok(Json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "bearer".to_string(),
    }))
}

/// Confirm a pending account with the emailed code
///
/// Confirming an already-confirmed account is not an error: the provider's
/// rejection is deliberately mapped to an advisory 200.
#[utoipa::path(
    post,
    path = "/users/verify",
    tag = "Users",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Account verified (or already verified)", body = DetailResponse),
        (status = 400, description = "Code mismatch or expired"),
        (status = 404, description = "User not found")
    )
)]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyRequest>,
) -> ApiResult<Json<DetailResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    match state.identity.as_ref() {
        AuthStrategy::Delegated { provider, .. } => {
            match provider
                .confirm_sign_up(&request.username, &request.confirmation_code)
                .await
            {
                Ok(()) => Ok(Json(DetailResponse::new("Account verified successfully."))),
                Err(IdentityError::AlreadyConfirmed) => {
                    Ok(Json(DetailResponse::new("User already verified.")))
                }
                Err(IdentityError::NotFound) => {
                    Err(ApiError::NotFound("User not found".to_string()))
                }
                Err(other) => Err(ApiError::from(other)),
            }
        }
        // Local accounts are confirmed at signup
        AuthStrategy::Local(_) => Ok(Json(DetailResponse::new("User already verified."))),
    }
}

/// Re-send the confirmation code for a pending account
#[utoipa::path(
    post,
    path = "/users/resend_confirmation_code",
    tag = "Users",
    params(
        ("username" = String, Query, description = "Account username")
    ),
    responses(
        (status = 200, description = "Code sent", body = DetailResponse),
        (status = 404, description = "User not found"),
        (status = 429, description = "Limit exceeded")
    )
)]
pub async fn resend_confirmation_code(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResendQuery>,
) -> ApiResult<Json<DetailResponse>> {
    match state.identity.as_ref() {
        AuthStrategy::Delegated { provider, .. } => {
            provider
                .resend_confirmation_code(&query.username)
                .await
                .map_err(|e| match e {
                    IdentityError::NotFound => ApiError::NotFound("User not found".to_string()),
                    IdentityError::RateLimited => {
                        ApiError::RateLimited("Limit exceeded".to_string())
                    }
                    other => ApiError::from(other),
                })?;

            Ok(Json(DetailResponse::new(
                "A new confirmation code has been sent.",
            )))
        }
        AuthStrategy::Local(_) => Err(ApiError::Validation(
            "Confirmation codes are not issued for this deployment".to_string(),
        )),
    }
}

/// The caller's own profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 400, description = "Account is disabled"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    RequireProfileScope(claims): RequireProfileScope,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .db
        .user_repo()
        .find_by_sub(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // A disabled mirror row locks the account out even with a live token
    if !user.enabled {
        return Err(ApiError::Validation("Inactive user".to_string()));
    }

    Ok(Json(UserResponse::from(user)))
}

/// Revoke the caller's sessions
///
/// Revocation happens upstream; the bearer string the client holds stays
/// syntactically valid until it expires.
#[utoipa::path(
    post,
    path = "/users/logout",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Signed out", body = DetailResponse),
        (status = 400, description = "Malformed access token"),
        (status = 401, description = "Invalid access token"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Bearer(token): Bearer,
) -> ApiResult<Json<DetailResponse>> {
    state.identity.sign_out(&token).await?;

    Ok(Json(DetailResponse::new("Logged out successfully.")))
}
