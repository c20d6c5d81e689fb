use crate::routes::projects::ProjectForm;
use crate::routes::Route;
use crate::session::{app_error, use_session};
use dioxus::prelude::*;
use shared_types::ProjectRequest;
use std::collections::HashMap;

/// Edit form for one project. Requires can-manage-projects on it; the
/// server enforces the same check.
#[component]
pub fn ProjectEdit(id: String) -> Element {
    let ctx = use_session();
    let mut field_errors: Signal<HashMap<String, String>> = use_signal(HashMap::new);
    let mut error: Signal<Option<String>> = use_signal(|| None);
    let mut saved = use_signal(|| false);

    let project_id = id.clone();
    let loaded = use_resource(move || {
        let id = project_id.clone();
        async move {
            let project = server::api::get_project(id.clone()).await?;
            let holidays = server::api::list_project_holidays(id).await?;
            Ok::<_, ServerFnError>((project, holidays))
        }
    });

    let submit_id = id.clone();
    let handle_update = move |req: ProjectRequest| {
        let id = submit_id.clone();
        spawn(async move {
            match server::api::update_project(id, req).await {
                Ok(updated) => {
                    tracing::info!(project_id = %updated.id(), "project updated");
                    field_errors.set(HashMap::new());
                    error.set(None);
                    saved.set(true);
                    ctx.reload();
                }
                Err(e) => {
                    let err = app_error(&e);
                    field_errors.set(err.field_errors.clone());
                    error.set(Some(err.message));
                    saved.set(false);
                }
            }
        });
    };

    let body = match &*loaded.read() {
        None => rsx! { p { class: "muted", "Loading project..." } },
        Some(Err(e)) => {
            let message = app_error(e).message;
            rsx! { div { class: "banner banner-error", "{message}" } }
        }
        Some(Ok((project, _))) if !project.capabilities().can_manage_projects => rsx! {
            div { class: "banner banner-error", "You cannot edit this project." }
        },
        Some(Ok((project, holidays))) => {
            let initial = ProjectRequest::from_project(&project.project, holidays.clone());
            rsx! {
                section { class: "card",
                    ProjectForm {
                        key: "{id}",
                        initial,
                        field_errors: field_errors(),
                        submit_label: "Save changes",
                        on_submit: handle_update,
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "page-header",
            h1 { "Project details" }
            Link { to: Route::Projects {}, class: "button button-ghost", "Back to projects" }
        }
        if let Some(message) = error() {
            div { class: "banner banner-error", "{message}" }
        }
        if saved() {
            div { class: "banner banner-success", "Changes saved" }
        }
        {body}
    }
}
