//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes and the
//! request and response bodies they exchange. Protected routes inherit the
//! document-wide `BearerToken` requirement; registration, login and the
//! probes opt out with `security([])`.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Error, ErrorCode, IssuedToken, User, Workout, WorkoutDetails, WorkoutDraft, WorkoutEntry,
    WorkoutEntryDraft, WorkoutPatch,
};
use crate::inbound::http::tokens::{AuthTokenResponse, LoginRequest};
use crate::inbound::http::users::{RegisterRequest, UpdateProfileRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME_NAME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME_NAME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Opaque token issued by POST /api/v1/tokens/authentication.",
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
        title = "Workout backend API",
        description = "Multi-user workout tracking with bearer token authentication.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::tokens::create_token,
        crate::inbound::http::tokens::revoke_tokens,
        crate::inbound::http::workouts::list_workouts,
        crate::inbound::http::workouts::create_workout,
        crate::inbound::http::workouts::get_workout,
        crate::inbound::http::workouts::update_workout,
        crate::inbound::http::workouts::delete_workout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        RegisterRequest,
        UpdateProfileRequest,
        LoginRequest,
        AuthTokenResponse,
        IssuedToken,
        Workout,
        WorkoutDetails,
        WorkoutEntry,
        WorkoutDraft,
        WorkoutEntryDraft,
        WorkoutPatch,
    )),
    tags(
        (name = "users", description = "Account registration and profile"),
        (name = "tokens", description = "Issuing and revoking bearer tokens"),
        (name = "workouts", description = "Workouts owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("User", "username")]
    #[case("User", "createdAt")]
    #[case("RegisterRequest", "password")]
    #[case("IssuedToken", "expiry")]
    #[case("WorkoutEntryDraft", "durationSeconds")]
    fn schema_has_field(#[case] schema_name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(schema_name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }

    #[test]
    fn user_schema_never_exposes_credentials() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(user)) = schemas.get("User").expect("User schema") else {
            panic!("expected Object schema");
        };

        assert!(!user.properties.keys().any(|key| key.contains("password")));
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(matches!(
            components.security_schemes.get(BEARER_SCHEME_NAME),
            Some(SecurityScheme::Http(_))
        ));
    }

    #[test]
    fn every_api_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/users",
            "/api/v1/users/me",
            "/api/v1/tokens/authentication",
            "/api/v1/workouts",
            "/api/v1/workouts/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
