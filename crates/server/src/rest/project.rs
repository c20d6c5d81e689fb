use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AccessibleProject, AppError, ProjectCapabilities, ProjectHoliday, ProjectRequest};
use crate::auth::extractors::AuthRequired;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/projects
// ---------------------------------------------------------------------------

/// List the projects the caller can open, ordered by name.
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Accessible projects", body = Vec<AccessibleProject>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<AccessibleProject>>, AppError> {
    Ok(Json(service::list_projects(&pool, &claims).await?))
}

// ---------------------------------------------------------------------------
// POST /api/projects
// ---------------------------------------------------------------------------

/// Create a project. The caller becomes its project manager.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = AccessibleProject),
        (status = 409, description = "Name already taken", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<AccessibleProject>), AppError> {
    let project = service::create_project(&pool, &claims, body).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

// ---------------------------------------------------------------------------
// GET /api/projects/{id}
// ---------------------------------------------------------------------------

/// Get a project the caller is a member of.
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project found", body = AccessibleProject),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<AccessibleProject>, AppError> {
    Ok(Json(service::get_project(&pool, &claims, &id).await?))
}

// ---------------------------------------------------------------------------
// PUT /api/projects/{id}
// ---------------------------------------------------------------------------

/// Update a project and replace its holidays. Requires can-manage-projects.
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project UUID")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = AccessibleProject),
        (status = 403, description = "Missing capability", body = AppError),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "projects"
)]
pub async fn update_project(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<ProjectRequest>,
) -> Result<Json<AccessibleProject>, AppError> {
    Ok(Json(service::update_project(&pool, &claims, &id, body).await?))
}

// ---------------------------------------------------------------------------
// DELETE /api/projects/{id}
// ---------------------------------------------------------------------------

/// Delete a project with its memberships and holidays. Requires can-manage-projects.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Missing capability", body = AppError),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "projects"
)]
pub async fn delete_project(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service::delete_project(&pool, &claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /api/projects/{id}/capabilities
// ---------------------------------------------------------------------------

/// The caller's role and resolved capabilities on a project.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/capabilities",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Caller capabilities", body = ProjectCapabilities),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "projects"
)]
pub async fn get_capabilities(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<ProjectCapabilities>, AppError> {
    Ok(Json(service::project_capabilities(&pool, &claims, &id).await?))
}

// ---------------------------------------------------------------------------
// GET /api/projects/{id}/holidays
// ---------------------------------------------------------------------------

/// Non-working days of a project, in date order.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/holidays",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project holidays", body = Vec<ProjectHoliday>),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "projects"
)]
pub async fn list_holidays(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProjectHoliday>>, AppError> {
    Ok(Json(service::list_holidays(&pool, &claims, &id).await?))
}
