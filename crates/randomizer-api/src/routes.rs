//! API Routes
//!
//! Route definitions for all API endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create the application routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/randoms", item_routes())
}

/// User and session routes
fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(handlers::users::signup))
        .route("/login", post(handlers::users::login))
        .route("/verify", post(handlers::users::verify))
        .route(
            "/resend_confirmation_code",
            post(handlers::users::resend_confirmation_code),
        )
        .route("/me", get(handlers::users::me))
        .route("/logout", post(handlers::users::logout))
        // Static segments win over the parameter, so /me stays reachable
        .route("/:sub", get(handlers::users::get_user))
}

/// Random item routes (all require the items scope)
fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/:id",
            get(handlers::items::get_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
}

/// Create Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}
