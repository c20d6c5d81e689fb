use axum::Router;
use shared_types::{
    AccessibleProject, AppError, AppErrorKind, Capability, CapabilitySet, Project,
    ProjectCapabilities, ProjectHoliday, ProjectMember, ProjectRequest, ProjectRole,
    RoleCapabilities, SetMemberRoleRequest, WorkingWeek,
};
use sqlx::{Pool, Postgres};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest;

/// Registers the Bearer header and the access cookie as auth schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                crate::auth::cookies::SITEBOOK_ACCESS,
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::project::list_projects,
        rest::project::create_project,
        rest::project::get_project,
        rest::project::update_project,
        rest::project::delete_project,
        rest::project::get_capabilities,
        rest::project::list_holidays,
        rest::membership::list_members,
        rest::membership::set_member_role,
        rest::membership::remove_member,
        rest::roles::list_roles,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        Project, AccessibleProject, ProjectRequest, ProjectHoliday, WorkingWeek,
        ProjectMember, SetMemberRoleRequest,
        ProjectRole, Capability, CapabilitySet, ProjectCapabilities, RoleCapabilities,
        HealthResponse,
    )),
    modifiers(&SecurityAddon),
    security(("bearer" = []), ("cookie" = [])),
    tags(
        (name = "projects", description = "Projects visible to the caller"),
        (name = "members", description = "Project role assignments"),
        (name = "roles", description = "Role vocabulary and capability table"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Sitebook API",
        description = "Construction project access control API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router serving the REST API at `/api/*`, `/health`, and
/// the API reference at `/docs` when the `api_docs` flag is on.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    let state = AppState { pool };
    let router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state);

    if crate::config::feature_flags().api_docs {
        router.merge(Scalar::with_url("/docs", ApiDoc::openapi()))
    } else {
        router
    }
}
