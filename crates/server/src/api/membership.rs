use dioxus::prelude::*;
use shared_types::{ProjectMember, ProjectRole};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::service;

#[cfg(feature = "server")]
use super::auth::*;

// ── Project Membership Server Functions ──────────────────

/// Members of a project. Any member may list them.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_project_members(project_id: String) -> Result<Vec<ProjectMember>, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::list_members(get_db().await, &claims, &project_id).await)
}

/// Assign a project role, adding the user to the project if needed.
/// Requires can-manage-members.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn set_member_role(
    project_id: String,
    user_id: i64,
    role: ProjectRole,
) -> Result<ProjectMember, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::set_member_role(get_db().await, &claims, &project_id, user_id, role).await)
}

/// Revoke a membership. Requires can-manage-members.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn remove_member(project_id: String, user_id: i64) -> Result<(), ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::remove_member(get_db().await, &claims, &project_id, user_id).await)
}
