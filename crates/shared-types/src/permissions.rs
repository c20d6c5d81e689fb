//! Role to capability resolution.
//!
//! The table in [`ProjectRole::capabilities`] is the only place a role is
//! mapped to what it may do. Adding a role or a capability is a single edit
//! there; the exhaustive `match` makes the compiler flag any role left
//! without an entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::ProjectRole;

/// A single named permission flag gating a UI action or section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Capability {
    #[serde(rename = "can-access-settings")]
    AccessSettings,
    /// Widens the project list to every project. Only honoured when held
    /// through the platform role; a project-scoped grant stays on its project.
    #[serde(rename = "can-view-all-projects")]
    ViewAllProjects,
    #[serde(rename = "can-manage-projects")]
    ManageProjects,
    #[serde(rename = "can-manage-members")]
    ManageMembers,
    #[serde(rename = "can-manage-personnel")]
    ManagePersonnel,
    #[serde(rename = "can-manage-squads")]
    ManageSquads,
    #[serde(rename = "can-manage-companies")]
    ManageCompanies,
    #[serde(rename = "can-manage-equipment")]
    ManageEquipment,
    #[serde(rename = "can-create-work-package")]
    CreateWorkPackage,
    #[serde(rename = "can-manage-material-take-off")]
    ManageMaterialTakeOff,
    #[serde(rename = "can-create-daily-report")]
    CreateDailyReport,
    #[serde(rename = "can-approve-daily-report")]
    ApproveDailyReport,
    #[serde(rename = "can-view-planning")]
    ViewPlanning,
}

/// The closed capability vocabulary.
pub const ALL_CAPABILITIES: &[Capability] = &[
    Capability::AccessSettings,
    Capability::ViewAllProjects,
    Capability::ManageProjects,
    Capability::ManageMembers,
    Capability::ManagePersonnel,
    Capability::ManageSquads,
    Capability::ManageCompanies,
    Capability::ManageEquipment,
    Capability::CreateWorkPackage,
    Capability::ManageMaterialTakeOff,
    Capability::CreateDailyReport,
    Capability::ApproveDailyReport,
    Capability::ViewPlanning,
];

impl Capability {
    pub fn key(&self) -> &'static str {
        match self {
            Capability::AccessSettings => "can-access-settings",
            Capability::ViewAllProjects => "can-view-all-projects",
            Capability::ManageProjects => "can-manage-projects",
            Capability::ManageMembers => "can-manage-members",
            Capability::ManagePersonnel => "can-manage-personnel",
            Capability::ManageSquads => "can-manage-squads",
            Capability::ManageCompanies => "can-manage-companies",
            Capability::ManageEquipment => "can-manage-equipment",
            Capability::CreateWorkPackage => "can-create-work-package",
            Capability::ManageMaterialTakeOff => "can-manage-material-take-off",
            Capability::CreateDailyReport => "can-create-daily-report",
            Capability::ApproveDailyReport => "can-approve-daily-report",
            Capability::ViewPlanning => "can-view-planning",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_CAPABILITIES.iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The full set of capability flags resolved for one role.
///
/// Every key of the vocabulary is always present; there is no way to build a
/// partially populated set. Serializes as a flat `{"can-...": bool}` object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub struct CapabilitySet {
    pub can_access_settings: bool,
    pub can_view_all_projects: bool,
    pub can_manage_projects: bool,
    pub can_manage_members: bool,
    pub can_manage_personnel: bool,
    pub can_manage_squads: bool,
    pub can_manage_companies: bool,
    pub can_manage_equipment: bool,
    pub can_create_work_package: bool,
    pub can_manage_material_take_off: bool,
    pub can_create_daily_report: bool,
    pub can_approve_daily_report: bool,
    pub can_view_planning: bool,
}

impl CapabilitySet {
    /// The default set: nothing granted.
    pub const NONE: CapabilitySet = CapabilitySet {
        can_access_settings: false,
        can_view_all_projects: false,
        can_manage_projects: false,
        can_manage_members: false,
        can_manage_personnel: false,
        can_manage_squads: false,
        can_manage_companies: false,
        can_manage_equipment: false,
        can_create_work_package: false,
        can_manage_material_take_off: false,
        can_create_daily_report: false,
        can_approve_daily_report: false,
        can_view_planning: false,
    };

    pub const ALL: CapabilitySet = CapabilitySet::granting(ALL_CAPABILITIES);

    /// Build a set granting exactly `granted`.
    pub const fn granting(granted: &[Capability]) -> CapabilitySet {
        let mut set = CapabilitySet::NONE;
        let mut i = 0;
        while i < granted.len() {
            set = set.with(granted[i], true);
            i += 1;
        }
        set
    }

    /// Copy of `self` with one flag set to `value`.
    pub const fn with(mut self, capability: Capability, value: bool) -> CapabilitySet {
        match capability {
            Capability::AccessSettings => self.can_access_settings = value,
            Capability::ViewAllProjects => self.can_view_all_projects = value,
            Capability::ManageProjects => self.can_manage_projects = value,
            Capability::ManageMembers => self.can_manage_members = value,
            Capability::ManagePersonnel => self.can_manage_personnel = value,
            Capability::ManageSquads => self.can_manage_squads = value,
            Capability::ManageCompanies => self.can_manage_companies = value,
            Capability::ManageEquipment => self.can_manage_equipment = value,
            Capability::CreateWorkPackage => self.can_create_work_package = value,
            Capability::ManageMaterialTakeOff => self.can_manage_material_take_off = value,
            Capability::CreateDailyReport => self.can_create_daily_report = value,
            Capability::ApproveDailyReport => self.can_approve_daily_report = value,
            Capability::ViewPlanning => self.can_view_planning = value,
        }
        self
    }

    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::AccessSettings => self.can_access_settings,
            Capability::ViewAllProjects => self.can_view_all_projects,
            Capability::ManageProjects => self.can_manage_projects,
            Capability::ManageMembers => self.can_manage_members,
            Capability::ManagePersonnel => self.can_manage_personnel,
            Capability::ManageSquads => self.can_manage_squads,
            Capability::ManageCompanies => self.can_manage_companies,
            Capability::ManageEquipment => self.can_manage_equipment,
            Capability::CreateWorkPackage => self.can_create_work_package,
            Capability::ManageMaterialTakeOff => self.can_manage_material_take_off,
            Capability::CreateDailyReport => self.can_create_daily_report,
            Capability::ApproveDailyReport => self.can_approve_daily_report,
            Capability::ViewPlanning => self.can_view_planning,
        }
    }

    /// Lookup by wire key. A key outside the vocabulary is a caller bug and
    /// never grants anything.
    pub fn allows_key(&self, key: &str) -> bool {
        Capability::from_key(key)
            .map(|c| self.allows(c))
            .unwrap_or(false)
    }

    /// Granted capabilities in vocabulary order.
    pub fn granted(&self) -> Vec<Capability> {
        ALL_CAPABILITIES
            .iter()
            .copied()
            .filter(|c| self.allows(*c))
            .collect()
    }

    /// True when every capability granted by `other` is granted here too.
    pub fn covers(&self, other: &CapabilitySet) -> bool {
        other.granted().into_iter().all(|c| self.allows(c))
    }
}

use Capability::*;

impl ProjectRole {
    /// The capability table.
    pub const fn capabilities(&self) -> CapabilitySet {
        match self {
            ProjectRole::Admin => CapabilitySet::ALL,
            ProjectRole::ProjectManager => CapabilitySet::ALL.with(ViewAllProjects, false),
            ProjectRole::SiteManager | ProjectRole::ConstructionManager => {
                CapabilitySet::granting(&[
                    AccessSettings,
                    ManageMembers,
                    ManagePersonnel,
                    ManageSquads,
                    ManageCompanies,
                    ManageEquipment,
                    CreateWorkPackage,
                    ManageMaterialTakeOff,
                    CreateDailyReport,
                    ApproveDailyReport,
                    ViewPlanning,
                ])
            }
            ProjectRole::ProjectEngineeringManager => CapabilitySet::granting(&[
                AccessSettings,
                ManageEquipment,
                CreateWorkPackage,
                ManageMaterialTakeOff,
                CreateDailyReport,
                ApproveDailyReport,
                ViewPlanning,
            ]),
            ProjectRole::Engineer => CapabilitySet::granting(&[
                CreateWorkPackage,
                ManageMaterialTakeOff,
                CreateDailyReport,
                ViewPlanning,
            ]),
            ProjectRole::Planner => {
                CapabilitySet::granting(&[CreateWorkPackage, ManageMaterialTakeOff, ViewPlanning])
            }
            ProjectRole::Supervisor => {
                CapabilitySet::granting(&[ManageSquads, CreateDailyReport, ViewPlanning])
            }
            ProjectRole::Foreman => CapabilitySet::granting(&[ManageSquads, CreateDailyReport]),
            ProjectRole::SubForeman => CapabilitySet::granting(&[CreateDailyReport]),
            ProjectRole::Storekeeper => {
                CapabilitySet::granting(&[ManageEquipment, ManageMaterialTakeOff])
            }
            ProjectRole::Operator | ProjectRole::Helper => CapabilitySet::NONE,
        }
    }
}

/// Resolve a role string (or its absence) to a capability set.
///
/// Total: unknown and absent roles resolve to [`CapabilitySet::NONE`].
pub fn resolve(role: Option<&str>) -> CapabilitySet {
    role.and_then(ProjectRole::parse)
        .map(|r| r.capabilities())
        .unwrap_or(CapabilitySet::NONE)
}

/// Strict lookup of one capability in a resolved set.
pub fn has_permission(set: &CapabilitySet, capability: Capability) -> bool {
    set.allows(capability)
}
