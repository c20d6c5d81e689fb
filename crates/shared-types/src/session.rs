//! Per-session project context.
//!
//! `ProjectSession` owns the accessible project list, the active-project
//! state machine and the persisted client settings. It is constructed at
//! sign-in and dropped (after [`ProjectSession::end_session`]) at sign-out;
//! nothing here is global.
//!
//! Loads are asynchronous in the UI but completions arrive one at a time.
//! Each reload is tagged with a [`ReloadToken`]; completions for anything
//! but the most recent token are discarded.

use crate::error::AppError;
use crate::permissions::CapabilitySet;
use crate::project::AccessibleProject;
use crate::role::ProjectRole;
use crate::settings::{ClientSettings, Language, SettingsStore};

/// Active-project state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveProject {
    /// No project list has been loaded yet.
    #[default]
    Uninitialized,
    Selected(AccessibleProject),
    /// The user has no accessible projects.
    Empty,
}

impl ActiveProject {
    pub fn project(&self) -> Option<&AccessibleProject> {
        match self {
            ActiveProject::Selected(p) => Some(p),
            ActiveProject::Uninitialized | ActiveProject::Empty => None,
        }
    }
}

/// Pick the active project from `accessible` (already in name order).
///
/// 1. the persisted id, if it is still accessible;
/// 2. otherwise the first project;
/// 3. otherwise none.
pub fn select_active_project<'a>(
    accessible: &'a [AccessibleProject],
    persisted_id: Option<&str>,
) -> Option<&'a AccessibleProject> {
    persisted_id
        .and_then(|id| accessible.iter().find(|p| p.id() == id))
        .or_else(|| accessible.first())
}

/// Sort projects the way the selection policy expects: by name, then id so
/// equal names still order deterministically.
pub fn sort_projects(projects: &mut [AccessibleProject]) {
    projects.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
}

/// Identifies one project-list reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReloadToken(u64);

/// What a completed reload did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadOutcome {
    /// The list was applied; `changed` is true if the active project id
    /// differs from before.
    Applied { active: Option<String>, changed: bool },
    /// A newer reload was started after this one; the result was dropped.
    Stale,
}

/// Application state for one authenticated session.
pub struct ProjectSession<S: SettingsStore> {
    store: S,
    settings: ClientSettings,
    projects: Vec<AccessibleProject>,
    active: ActiveProject,
    issued: u64,
}

impl<S: SettingsStore> ProjectSession<S> {
    /// Start a session over `store`, reading persisted settings once.
    pub fn new(store: S) -> Self {
        let settings = ClientSettings::load(&store);
        Self {
            store,
            settings,
            projects: Vec::new(),
            active: ActiveProject::Uninitialized,
            issued: 0,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Accessible projects in name order.
    pub fn projects(&self) -> &[AccessibleProject] {
        &self.projects
    }

    pub fn state(&self) -> &ActiveProject {
        &self.active
    }

    pub fn active_project(&self) -> Option<&AccessibleProject> {
        self.active.project()
    }

    pub fn active_project_id(&self) -> Option<&str> {
        self.active_project().map(|p| p.id())
    }

    /// Caller's role on the active project.
    pub fn active_role(&self) -> Option<ProjectRole> {
        self.active_project().and_then(|p| p.role)
    }

    /// Capabilities for the active project; nothing when none is active.
    pub fn capabilities(&self) -> CapabilitySet {
        self.active_project()
            .map(|p| p.capabilities())
            .unwrap_or(CapabilitySet::NONE)
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self.active, ActiveProject::Uninitialized)
    }

    /// Register a new reload. Any completion for an earlier token becomes
    /// stale from this point on.
    pub fn begin_reload(&mut self) -> ReloadToken {
        self.issued += 1;
        ReloadToken(self.issued)
    }

    /// Apply the result of the reload identified by `token`.
    ///
    /// On `Err` the session is left untouched and the error is returned
    /// to the caller for reporting.
    pub fn complete_reload(
        &mut self,
        token: ReloadToken,
        result: Result<Vec<AccessibleProject>, AppError>,
    ) -> Result<ReloadOutcome, AppError> {
        if token.0 != self.issued {
            return Ok(ReloadOutcome::Stale);
        }

        let mut projects = result?;
        sort_projects(&mut projects);

        let previous = self.active_project_id().map(str::to_string);
        self.projects = projects;
        self.reselect();

        let active = self.active_project_id().map(str::to_string);
        let changed = active != previous;
        Ok(ReloadOutcome::Applied { active, changed })
    }

    /// Switch explicitly to an accessible project.
    pub fn switch_project(&mut self, project_id: &str) -> Result<&AccessibleProject, AppError> {
        let project = self
            .projects
            .iter()
            .find(|p| p.id() == project_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Project is not accessible"))?;

        self.select(Some(project));
        self.active_project()
            .ok_or_else(|| AppError::internal("Project selection was not applied"))
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.settings.sidebar_collapsed = collapsed;
        ClientSettings::write_sidebar_collapsed(&mut self.store, collapsed);
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        ClientSettings::write_language(&mut self.store, language);
    }

    /// Tear down at sign-out: forget the loaded projects and invalidate any
    /// in-flight reload. Persisted preferences survive so the next sign-in
    /// can restore the last project.
    pub fn end_session(&mut self) {
        self.issued += 1;
        self.projects.clear();
        self.active = ActiveProject::Uninitialized;
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn reselect(&mut self) {
        let chosen = select_active_project(
            &self.projects,
            self.settings.active_project_id.as_deref(),
        )
        .cloned();
        self.select(chosen);
    }

    fn select(&mut self, project: Option<AccessibleProject>) {
        let id = project.as_ref().map(|p| p.id().to_string());
        ClientSettings::write_active_project(&mut self.store, id.as_deref());
        self.settings.active_project_id = id;
        self.active = match project {
            Some(p) => ActiveProject::Selected(p),
            None => ActiveProject::Empty,
        };
    }
}
