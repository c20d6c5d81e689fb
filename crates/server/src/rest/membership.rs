use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, ProjectMember, SetMemberRoleRequest};
use crate::auth::extractors::AuthRequired;
use crate::service;

/// List the members of a project. Any member may call this.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/members",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project members", body = Vec<ProjectMember>),
        (status = 404, description = "Not found or not a member", body = AppError)
    ),
    tag = "members"
)]
pub async fn list_members(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProjectMember>>, AppError> {
    Ok(Json(service::list_members(&pool, &claims, &id).await?))
}

/// Assign a project role, adding the membership if needed.
/// Requires can-manage-members.
#[utoipa::path(
    put,
    path = "/api/projects/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Project UUID"),
        ("user_id" = i64, Path, description = "User ID")
    ),
    request_body = SetMemberRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = ProjectMember),
        (status = 403, description = "Missing capability", body = AppError),
        (status = 404, description = "Project or user not found", body = AppError),
        (status = 409, description = "Would remove the last project manager", body = AppError)
    ),
    tag = "members"
)]
pub async fn set_member_role(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path((id, user_id)): Path<(String, i64)>,
    Json(body): Json<SetMemberRoleRequest>,
) -> Result<Json<ProjectMember>, AppError> {
    Ok(Json(
        service::set_member_role(&pool, &claims, &id, user_id, body.role).await?,
    ))
}

/// Revoke a membership. Requires can-manage-members.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Project UUID"),
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 403, description = "Missing capability", body = AppError),
        (status = 404, description = "Project or member not found", body = AppError),
        (status = 409, description = "Would remove the last project manager", body = AppError)
    ),
    tag = "members"
)]
pub async fn remove_member(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path((id, user_id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    service::remove_member(&pool, &claims, &id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
