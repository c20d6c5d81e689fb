use axum::Json;

use shared_types::{RoleCapabilities, ALL_ROLES};
use crate::auth::extractors::MaybeAuth;

/// The project-role vocabulary with each role's resolved capability set.
/// Public; the table is the same for every caller.
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Role table", body = Vec<RoleCapabilities>)
    ),
    tag = "roles"
)]
pub async fn list_roles(MaybeAuth(claims): MaybeAuth) -> Json<Vec<RoleCapabilities>> {
    tracing::debug!(user_id = claims.as_ref().map(|c| c.sub), "role table requested");
    Json(ALL_ROLES.iter().copied().map(RoleCapabilities::from).collect())
}
