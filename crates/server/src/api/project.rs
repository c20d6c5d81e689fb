use dioxus::prelude::*;
use shared_types::{AccessibleProject, ProjectCapabilities, ProjectHoliday, ProjectRequest};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::service;

#[cfg(feature = "server")]
use super::auth::*;

/// Projects the caller can open, each with the caller's role on it.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_my_projects() -> Result<Vec<AccessibleProject>, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::list_projects(get_db().await, &claims).await)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_project(id: String) -> Result<AccessibleProject, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::get_project(get_db().await, &claims, &id).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn create_project(req: ProjectRequest) -> Result<AccessibleProject, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::create_project(get_db().await, &claims, req).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn update_project(
    id: String,
    req: ProjectRequest,
) -> Result<AccessibleProject, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::update_project(get_db().await, &claims, &id, req).await)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn delete_project(id: String) -> Result<(), ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::delete_project(get_db().await, &claims, &id).await)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_project_holidays(project_id: String) -> Result<Vec<ProjectHoliday>, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::list_holidays(get_db().await, &claims, &project_id).await)
}

/// The caller's role and capability set on one project.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_project_capabilities(
    project_id: String,
) -> Result<ProjectCapabilities, ServerFnError> {
    let claims = require_auth()?;
    to_sfn(service::project_capabilities(get_db().await, &claims, &project_id).await)
}
