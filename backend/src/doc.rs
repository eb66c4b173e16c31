//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every endpoint of the inbound HTTP layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`] and the
//! bearer token security scheme.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::registration::{RegisterRequest, RegisteredResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, ProfileSchema, RoleSchema, UserSchema,
};
use crate::inbound::http::snippets::{SnippetOwnerResponse, SnippetRequest, SnippetResponse};
use crate::inbound::http::tokens::{
    AccessTokenResponse, LoginRequest, RefreshRequest, TokenPairResponse,
};
use crate::inbound::http::users::{GreetingResponse, ProfileResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/v1/token/ or /api/v1/login/.",
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
        title = "Campus auth API",
        description = "Role-based registration, token authentication, role-scoped user queries \
                       and owner-scoped code snippets."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::registration::register,
        crate::inbound::http::tokens::obtain_token,
        crate::inbound::http::tokens::login,
        crate::inbound::http::tokens::refresh_token,
        crate::inbound::http::users::current_profile,
        crate::inbound::http::users::protected_greeting,
        crate::inbound::http::users::list_users_by_role,
        crate::inbound::http::snippets::list_snippets,
        crate::inbound::http::snippets::create_snippet,
        crate::inbound::http::snippets::get_snippet,
        crate::inbound::http::snippets::replace_snippet,
        crate::inbound::http::snippets::delete_snippet,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        UserSchema,
        ProfileSchema,
        RegisterRequest,
        RegisteredResponse,
        LoginRequest,
        TokenPairResponse,
        RefreshRequest,
        AccessTokenResponse,
        ProfileResponse,
        GreetingResponse,
        SnippetRequest,
        SnippetResponse,
        SnippetOwnerResponse,
    )),
    tags(
        (name = "registration", description = "Self-service account creation"),
        (name = "tokens", description = "Access and refresh token issuance"),
        (name = "users", description = "Authenticated account queries"),
        (name = "snippets", description = "Code snippets; writes limited to the owner"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
