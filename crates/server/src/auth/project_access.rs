use shared_types::{resolve, AppError, Capability, CapabilitySet, ProjectCapabilities, ProjectRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::jwt::Claims;
use crate::repo::{self, Viewer};

/// The caller's standing on one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectGrant {
    pub project_id: Uuid,
    pub role: Option<ProjectRole>,
    pub capabilities: CapabilitySet,
}

impl ProjectGrant {
    /// Resolve a stored role string into a grant.
    pub fn from_role(project_id: Uuid, role: &str) -> Self {
        Self {
            project_id,
            role: ProjectRole::parse(role),
            capabilities: resolve(Some(role)),
        }
    }

    /// `Forbidden` unless the grant includes `capability`.
    pub fn check(&self, capability: Capability) -> Result<(), AppError> {
        if self.capabilities.allows(capability) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "{} permission required on this project",
                capability.key()
            )))
        }
    }

    /// `Forbidden` when `role` carries a capability this grant lacks.
    /// Checked against both the role being handed out and the role the
    /// member already holds.
    pub fn check_can_manage_role(&self, role: Option<ProjectRole>) -> Result<(), AppError> {
        let required = role.map(|r| r.capabilities()).unwrap_or(CapabilitySet::NONE);
        if self.capabilities.covers(&required) {
            return Ok(());
        }
        let name = role.map(|r| r.display_name()).unwrap_or("unknown");
        Err(AppError::forbidden(format!(
            "Your role cannot manage members with the {name} role"
        )))
    }
}

impl From<ProjectGrant> for ProjectCapabilities {
    fn from(grant: ProjectGrant) -> Self {
        Self {
            project_id: grant.project_id.to_string(),
            role: grant.role,
            capabilities: grant.capabilities,
        }
    }
}

fn project_not_found() -> AppError {
    AppError::not_found("Project not found")
}

/// The caller's grant on a project. Non-members get `NotFound`, so the
/// response does not reveal whether the project exists.
pub async fn project_grant(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: Uuid,
) -> Result<ProjectGrant, AppError> {
    let role = repo::membership::role_of(pool, Viewer::from(claims), project_id)
        .await?
        .ok_or_else(project_not_found)?;
    Ok(ProjectGrant::from_role(project_id, &role))
}

/// Require `capability` on a project. Non-members get `NotFound`; members
/// without the capability get `Forbidden`.
pub async fn require_capability(
    pool: &Pool<Postgres>,
    claims: &Claims,
    project_id: Uuid,
    capability: Capability,
) -> Result<ProjectGrant, AppError> {
    let grant = project_grant(pool, claims, project_id).await?;
    if let Err(e) = grant.check(capability) {
        tracing::warn!(
            user_id = claims.sub,
            %project_id,
            role = ?grant.role,
            capability = capability.key(),
            "project capability denied"
        );
        return Err(e);
    }
    Ok(grant)
}
