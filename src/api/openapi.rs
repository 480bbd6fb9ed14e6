//! OpenAPI document for the gateway surface.

use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "enirejo",
        description = "Single sign-on authentication gateway"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::login::login,
        crate::api::handlers::auth::register::register,
        crate::api::handlers::auth::me::me,
        crate::api::handlers::auth::sso::login_page,
        crate::api::handlers::auth::logout::logout,
    ),
    components(schemas(
        crate::api::handlers::auth::types::LoginRequest,
        crate::api::handlers::auth::types::RegisterRequest,
        crate::api::handlers::auth::types::IdentityView,
        crate::api::handlers::auth::types::MessageResponse,
    )),
    tags(
        (name = "auth", description = "Authentication and session handoff"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
