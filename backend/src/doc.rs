//! OpenAPI document for the REST API.
//!
//! Registers every HTTP endpoint plus the schemas they reference. The
//! generated document is served at `/api-docs/openapi.json` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, HoleDetail, PlayerStatistics, PublicUser, Round, RoundSummary};
use crate::inbound::http::auth::{
    AuthStatusResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::rounds::{CreateRoundRequest, DetailedScoreInput, RoundsResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the round tracker API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Golf round tracker API",
        description = "Session-authenticated round recording, listing, and statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::health::health,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::check,
        crate::inbound::http::rounds::list_rounds,
        crate::inbound::http::rounds::create_round,
        crate::inbound::http::rounds::statistics,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PublicUser,
        Round,
        RoundSummary,
        HoleDetail,
        PlayerStatistics,
        HealthResponse,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        AuthStatusResponse,
        RoundsResponse,
        CreateRoundRequest,
        DetailedScoreInput,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Registration and session management"),
        (name = "rounds", description = "Round recording and statistics")
    )
)]
pub struct ApiDoc;
