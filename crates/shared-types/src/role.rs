use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's function on a single project.
///
/// Roles are project-scoped: the same user can be `Engineer` on one project
/// and `SiteManager` on another. Stored lowercase with `-` separators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ProjectRole {
    Admin,
    ProjectManager,
    SiteManager,
    ConstructionManager,
    ProjectEngineeringManager,
    Engineer,
    Planner,
    Supervisor,
    Foreman,
    SubForeman,
    Operator,
    Helper,
    Storekeeper,
}

/// Every role, in the order the UI lists them.
pub const ALL_ROLES: &[ProjectRole] = &[
    ProjectRole::Admin,
    ProjectRole::ProjectManager,
    ProjectRole::SiteManager,
    ProjectRole::ConstructionManager,
    ProjectRole::ProjectEngineeringManager,
    ProjectRole::Engineer,
    ProjectRole::Planner,
    ProjectRole::Supervisor,
    ProjectRole::Foreman,
    ProjectRole::SubForeman,
    ProjectRole::Operator,
    ProjectRole::Helper,
    ProjectRole::Storekeeper,
];

impl ProjectRole {
    /// Parse a stored or user-supplied role string.
    ///
    /// Matching ignores case and surrounding whitespace, and accepts `_` or
    /// spaces in place of `-` (`Site_Manager`, `site manager`). Unknown
    /// values yield `None`; callers must not treat that as any role.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        ALL_ROLES
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
    }

    /// Canonical lowercase string for database / API storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Admin => "admin",
            ProjectRole::ProjectManager => "project-manager",
            ProjectRole::SiteManager => "site-manager",
            ProjectRole::ConstructionManager => "construction-manager",
            ProjectRole::ProjectEngineeringManager => "project-engineering-manager",
            ProjectRole::Engineer => "engineer",
            ProjectRole::Planner => "planner",
            ProjectRole::Supervisor => "supervisor",
            ProjectRole::Foreman => "foreman",
            ProjectRole::SubForeman => "sub-foreman",
            ProjectRole::Operator => "operator",
            ProjectRole::Helper => "helper",
            ProjectRole::Storekeeper => "storekeeper",
        }
    }

    /// Human-readable label for pickers and tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectRole::Admin => "Administrator",
            ProjectRole::ProjectManager => "Project Manager",
            ProjectRole::SiteManager => "Site Manager",
            ProjectRole::ConstructionManager => "Construction Manager",
            ProjectRole::ProjectEngineeringManager => "Project Engineering Manager",
            ProjectRole::Engineer => "Engineer",
            ProjectRole::Planner => "Planner",
            ProjectRole::Supervisor => "Supervisor",
            ProjectRole::Foreman => "Foreman",
            ProjectRole::SubForeman => "Sub-Foreman",
            ProjectRole::Operator => "Operator",
            ProjectRole::Helper => "Helper",
            ProjectRole::Storekeeper => "Storekeeper",
        }
    }

    /// Elevated roles used for coarse UI branching. This is a membership
    /// test and deliberately ignores the capability table.
    pub fn is_admin_class(&self) -> bool {
        matches!(
            self,
            ProjectRole::Admin
                | ProjectRole::ProjectManager
                | ProjectRole::SiteManager
                | ProjectRole::ConstructionManager
        )
    }

    /// On-site operational roles.
    pub fn is_field_role(&self) -> bool {
        matches!(
            self,
            ProjectRole::Supervisor
                | ProjectRole::Foreman
                | ProjectRole::SubForeman
                | ProjectRole::Operator
                | ProjectRole::Helper
        )
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-level form of [`ProjectRole::is_admin_class`]. Absent or
/// unrecognized roles are never admin-class.
pub fn is_admin_class(role: Option<&str>) -> bool {
    role.and_then(ProjectRole::parse)
        .map(|r| r.is_admin_class())
        .unwrap_or(false)
}

/// String-level form of [`ProjectRole::is_field_role`].
pub fn is_field_role(role: Option<&str>) -> bool {
    role.and_then(ProjectRole::parse)
        .map(|r| r.is_field_role())
        .unwrap_or(false)
}
