//! OpenAPI Documentation
//!
//! Auto-generated OpenAPI 3.0 specification for the Randomizer API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// Randomizer API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Randomizer API",
        description = "Per-user random number storage with delegated identity.",
        version = "0.1.0",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    paths(
        // Health
        handlers::health::health_check,
        handlers::health::readiness_check,
        // Users
        handlers::users::signup,
        handlers::users::login,
        handlers::users::verify,
        handlers::users::resend_confirmation_code,
        handlers::users::me,
        handlers::users::logout,
        handlers::users::get_user,
        // Randoms
        handlers::items::list_items,
        handlers::items::create_item,
        handlers::items::get_item,
        handlers::items::update_item,
        handlers::items::delete_item,
    ),
    components(
        schemas(
            // Common
            ErrorResponse,
            dto::DetailResponse,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            // Users
            dto::SignupRequest,
            dto::SignupResponse,
            dto::LoginForm,
            dto::TokenResponse,
            dto::VerifyRequest,
            dto::ResendQuery,
            dto::UserResponse,
            // Randoms
            dto::CreateRandomItemRequest,
            dto::UpdateRandomItemRequest,
            dto::RandomItemResponse,
            dto::ListParams,
            dto::DeleteResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Users", description = "Account lifecycle and sessions"),
        (name = "Randoms", description = "Per-user random number items")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Randomizer API");
        assert_eq!(spec.info.version, "0.1.0");
    }

    #[test]
    fn test_bearer_scheme_present() {
        let spec = ApiDoc::openapi();
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
