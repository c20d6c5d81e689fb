use dioxus::prelude::*;
use shared_types::{
    AccessibleProject, AppError, Language, ProjectSession, ReloadOutcome, ReloadToken,
};

use crate::storage::BrowserStore;

/// Turn a server function error back into the `AppError` the server sent.
pub fn app_error(err: &ServerFnError) -> AppError {
    let message = err.to_string();
    AppError::from_server_error(&message)
        .unwrap_or_else(|| AppError::internal(AppError::friendly_message(&message)))
}

/// The signed-in user's project session, provided at the root.
///
/// `ready` flips once `localStorage` has been read; project loads wait for
/// it so the persisted active project is known before the first selection.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionContext {
    pub session: Signal<ProjectSession<BrowserStore>>,
    pub ready: Signal<bool>,
    pub last_error: Signal<Option<AppError>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session: Signal::new(ProjectSession::new(BrowserStore::default())),
            ready: Signal::new(false),
            last_error: Signal::new(None),
        }
    }

    /// Replace the session with one built over the hydrated store.
    pub fn hydrated(&mut self, store: BrowserStore) {
        self.session.set(ProjectSession::new(store));
        self.ready.set(true);
    }

    /// Reload the accessible project list and re-run the selection policy.
    /// Completions of superseded reloads are dropped by the session.
    pub fn reload(mut self) {
        let token = self.session.write().begin_reload();
        spawn(async move {
            let result = server::api::list_my_projects()
                .await
                .map_err(|e| app_error(&e));
            self.complete(token, result);
        });
    }

    fn complete(&mut self, token: ReloadToken, result: Result<Vec<AccessibleProject>, AppError>) {
        let outcome = self.session.write().complete_reload(token, result);
        match outcome {
            Ok(ReloadOutcome::Applied { active, changed }) => {
                self.last_error.set(None);
                if changed {
                    tracing::info!(active = ?active, "active project changed");
                }
            }
            Ok(ReloadOutcome::Stale) => {
                tracing::debug!("discarding superseded project reload");
            }
            Err(e) => {
                tracing::warn!(error = %e.message, "project reload failed");
                self.last_error.set(Some(e));
            }
        }
    }

    /// Explicitly switch to an accessible project.
    pub fn switch_project(&mut self, project_id: &str) {
        let result = self
            .session
            .write()
            .switch_project(project_id)
            .map(|p| p.id().to_string());
        match result {
            Ok(id) => tracing::info!(project_id = %id, "switched project"),
            Err(e) => self.last_error.set(Some(e)),
        }
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.session.write().set_sidebar_collapsed(collapsed);
    }

    pub fn set_language(&mut self, language: Language) {
        self.session.write().set_language(language);
        apply_language(language);
    }

    /// Forget the loaded projects at sign-out.
    pub fn end(&mut self) {
        self.session.write().end_session();
        self.last_error.set(None);
    }
}

/// Reflect the interface language on the document element.
pub fn apply_language(language: Language) {
    let _ = document::eval(&format!(
        "document.documentElement.lang = \"{}\";",
        language.code()
    ));
}

/// Hook to access the session context.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
