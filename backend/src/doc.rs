//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response DTOs,
//! the error envelope wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) and the
//! bearer token security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::businesses::{BusinessResponse, CreateBusinessRequest};
use crate::inbound::http::reviews::{ReviewRequest, ReviewResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pulse Square API",
        description = "Local business directory with reviews and rating aggregates."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::businesses::search_businesses,
        crate::inbound::http::businesses::featured_businesses,
        crate::inbound::http::businesses::get_business,
        crate::inbound::http::businesses::create_business,
        crate::inbound::http::businesses::reconcile_business,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        BusinessResponse,
        CreateBusinessRequest,
        ReviewRequest,
        ReviewResponse,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserResponse
    )),
    tags(
        (name = "businesses", description = "Listing discovery and creation"),
        (name = "reviews", description = "Reviews and rating aggregates"),
        (name = "auth", description = "Account registration and login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
