pub mod membership;
pub mod project;
pub mod roles;

use axum::{routing::{get, put}, Router};
use crate::db::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Projects
        .route("/api/projects", get(project::list_projects).post(project::create_project))
        .route(
            "/api/projects/{id}",
            get(project::get_project)
                .put(project::update_project)
                .delete(project::delete_project),
        )
        .route("/api/projects/{id}/capabilities", get(project::get_capabilities))
        .route("/api/projects/{id}/holidays", get(project::list_holidays))
        // Members
        .route("/api/projects/{id}/members", get(membership::list_members))
        .route(
            "/api/projects/{id}/members/{user_id}",
            put(membership::set_member_role).delete(membership::remove_member),
        )
        // Role vocabulary
        .route("/api/roles", get(roles::list_roles))
}
