pub mod holiday;
pub mod membership;
pub mod project;

use shared_types::{AppError, Capability, ProjectRole};
use uuid::Uuid;

/// Who is asking. Project visibility depends on both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: i64,
    /// Platform administrators see every project with the admin role.
    pub platform_admin: bool,
}

impl Viewer {
    /// The role the viewer holds on every project regardless of
    /// membership. Project-scoped roles never reach beyond their project.
    pub fn platform_role(&self) -> Option<ProjectRole> {
        self.platform_admin.then_some(ProjectRole::Admin)
    }

    /// Whether the project list covers every project rather than only
    /// the viewer's memberships.
    pub fn sees_all_projects(&self) -> bool {
        self.platform_role()
            .is_some_and(|role| role.capabilities().allows(Capability::ViewAllProjects))
    }
}

impl From<&crate::auth::jwt::Claims> for Viewer {
    fn from(claims: &crate::auth::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            platform_admin: claims.is_platform_admin(),
        }
    }
}

/// Parse a project id received over the wire.
pub fn parse_project_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::bad_request("Invalid project id"))
}
