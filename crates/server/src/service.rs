//! Project and membership operations shared by server functions and REST
//! handlers. Each operation authorizes the caller against the project before
//! touching the store.

use shared_types::{
    AccessibleProject, AppError, Capability, ProjectCapabilities, ProjectHoliday, ProjectMember,
    ProjectRequest, ProjectRole,
};
use sqlx::{Pool, Postgres};

use crate::auth::jwt::Claims;
use crate::auth::project_access::{project_grant, require_capability, ProjectGrant};
use crate::error_convert::ValidateRequest;
use crate::repo::{self, parse_project_id, Viewer};

fn validated(req: ProjectRequest) -> Result<ProjectRequest, AppError> {
    let req = req.normalized();
    req.validate_request()?;
    Ok(req)
}

pub async fn list_projects(
    pool: &Pool<Postgres>,
    claims: &Claims,
) -> Result<Vec<AccessibleProject>, AppError> {
    repo::project::list_for_user(pool, Viewer::from(claims)).await
}

pub async fn get_project(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
) -> Result<AccessibleProject, AppError> {
    let id = parse_project_id(project_id)?;
    repo::project::find_for_user(pool, Viewer::from(claims), id)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))
}

/// Any authenticated user may create a project; the creator becomes its
/// project manager.
pub async fn create_project(
    pool: &Pool<Postgres>,
    claims: &Claims,
    req: ProjectRequest,
) -> Result<AccessibleProject, AppError> {
    let req = validated(req)?;
    let project = repo::project::create(pool, Viewer::from(claims), &req).await?;
    tracing::info!(user_id = claims.sub, project_id = project.id(), name = project.name(), "project created");
    Ok(project)
}

pub async fn update_project(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
    req: ProjectRequest,
) -> Result<AccessibleProject, AppError> {
    let id = parse_project_id(project_id)?;
    require_capability(pool, claims, id, Capability::ManageProjects).await?;
    let req = validated(req)?;
    let project = repo::project::update(pool, Viewer::from(claims), id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    tracing::info!(user_id = claims.sub, project_id = project.id(), "project updated");
    Ok(project)
}

pub async fn delete_project(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
) -> Result<(), AppError> {
    let id = parse_project_id(project_id)?;
    require_capability(pool, claims, id, Capability::ManageProjects).await?;
    if !repo::project::delete(pool, id).await? {
        return Err(AppError::not_found("Project not found"));
    }
    tracing::info!(user_id = claims.sub, %id, "project deleted");
    Ok(())
}

pub async fn project_capabilities(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
) -> Result<ProjectCapabilities, AppError> {
    let id = parse_project_id(project_id)?;
    Ok(project_grant(pool, claims, id).await?.into())
}

pub async fn list_holidays(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
) -> Result<Vec<ProjectHoliday>, AppError> {
    let id = parse_project_id(project_id)?;
    project_grant(pool, claims, id).await?;
    repo::holiday::list(pool, id).await
}

pub async fn list_members(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
) -> Result<Vec<ProjectMember>, AppError> {
    let id = parse_project_id(project_id)?;
    project_grant(pool, claims, id).await?;
    repo::membership::list(pool, id).await
}

/// The caller may only hand out, change or revoke roles whose capabilities
/// their own grant covers.
async fn guard_role_change(
    pool: &Pool<Postgres>,
    claims: &Claims,
    grant: &ProjectGrant,
    user_id: i64,
    new_role: Option<ProjectRole>,
) -> Result<(), AppError> {
    let current = repo::membership::member_role(pool, grant.project_id, user_id)
        .await?
        .and_then(|role| ProjectRole::parse(&role));

    let checked = grant
        .check_can_manage_role(new_role)
        .and_then(|()| grant.check_can_manage_role(current));
    if let Err(e) = &checked {
        tracing::warn!(
            user_id = claims.sub,
            project_id = %grant.project_id,
            member_id = user_id,
            caller_role = ?grant.role,
            current_role = ?current,
            new_role = ?new_role,
            error = %e.message,
            "member role change denied"
        );
    }
    checked
}

pub async fn set_member_role(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
    user_id: i64,
    role: ProjectRole,
) -> Result<ProjectMember, AppError> {
    let id = parse_project_id(project_id)?;
    let grant = require_capability(pool, claims, id, Capability::ManageMembers).await?;
    guard_role_change(pool, claims, &grant, user_id, Some(role)).await?;
    let member = repo::membership::set_role(pool, id, user_id, role).await?;
    tracing::info!(
        user_id = claims.sub,
        %id,
        member_id = user_id,
        role = role.as_str(),
        "project role assigned"
    );
    Ok(member)
}

pub async fn remove_member(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: &str,
    user_id: i64,
) -> Result<(), AppError> {
    let id = parse_project_id(project_id)?;
    let grant = require_capability(pool, claims, id, Capability::ManageMembers).await?;
    guard_role_change(pool, claims, &grant, user_id, None).await?;
    if !repo::membership::remove(pool, id, user_id).await? {
        return Err(AppError::not_found("Member not found"));
    }
    tracing::info!(user_id = claims.sub, %id, member_id = user_id, "project member removed");
    Ok(())
}
