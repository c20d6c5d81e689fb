use dioxus::prelude::*;
use shared_types::{AuthUser, CapabilitySet, ProjectRole};

use crate::session::use_session;

/// Global authentication state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthState {
    pub current_user: Signal<Option<AuthUser>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            current_user: Signal::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.read().is_some()
    }

    pub fn set_user(&mut self, user: AuthUser) {
        self.current_user.set(Some(user));
    }

    pub fn clear_auth(&mut self) {
        self.current_user.set(None);
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}

/// Capabilities on the active project. Nothing is granted while no project
/// is selected.
pub fn use_permissions() -> CapabilitySet {
    let ctx = use_session();
    let capabilities = ctx.session.read().capabilities();
    capabilities
}

/// The caller's role on the active project.
pub fn use_active_role() -> Option<ProjectRole> {
    let ctx = use_session();
    let role = ctx.session.read().active_role();
    role
}

pub fn use_is_admin_class() -> bool {
    use_active_role().is_some_and(|r| r.is_admin_class())
}

pub fn use_is_field_role() -> bool {
    use_active_role().is_some_and(|r| r.is_field_role())
}

/// Which sidebar groups the current user can see on the active project.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SidebarVisibility {
    pub core: bool,
    /// Team pages need a selected project.
    pub team: bool,
    pub administration: bool,
    pub settings: bool,
}

impl SidebarVisibility {
    pub fn for_role(role: Option<ProjectRole>) -> Self {
        let caps = role.map(|r| r.capabilities()).unwrap_or(CapabilitySet::NONE);
        Self {
            core: true,
            team: role.is_some(),
            administration: caps.can_manage_projects || caps.can_manage_members,
            settings: caps.can_access_settings,
        }
    }
}

pub fn use_sidebar_visibility() -> SidebarVisibility {
    SidebarVisibility::for_role(use_active_role())
}
