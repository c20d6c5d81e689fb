use crate::session::use_session;
use dioxus::prelude::*;
use shared_types::ActiveProject;

/// Active-project picker in the sidebar header.
///
/// Lists the accessible projects (already in name order) with the caller's
/// role on each. Choosing one switches the session, which persists the id
/// and recomputes every capability-gated view.
#[component]
pub fn ProjectPicker() -> Element {
    let mut ctx = use_session();
    let mut open = use_signal(|| false);
    let mut filter = use_signal(String::new);

    let session = ctx.session.read();
    let (current_name, current_role) = match session.state() {
        ActiveProject::Selected(p) => (
            p.name().to_string(),
            p.role.map(|r| r.display_name()).unwrap_or("No role"),
        ),
        ActiveProject::Empty => ("No projects".to_string(), ""),
        ActiveProject::Uninitialized => ("Loading projects...".to_string(), ""),
    };
    let active_id = session.active_project_id().map(str::to_string);

    let q = filter.read().to_lowercase();
    let options: Vec<(String, String, &'static str)> = session
        .projects()
        .iter()
        .filter(|p| {
            q.is_empty()
                || p.name().to_lowercase().contains(&q)
                || p
                    .project
                    .code
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&q))
        })
        .map(|p| {
            (
                p.id().to_string(),
                p.name().to_string(),
                p.role.map(|r| r.display_name()).unwrap_or(""),
            )
        })
        .collect();
    let total = session.projects().len();
    drop(session);

    rsx! {
        div { class: "project-picker",
            button {
                class: "project-picker-trigger",
                disabled: total == 0,
                onclick: move |_| open.toggle(),
                span { class: "project-picker-name", "{current_name}" }
                if !current_role.is_empty() {
                    span { class: "badge", "{current_role}" }
                }
            }
            if open() {
                div { class: "project-picker-menu",
                    if total > 5 {
                        input {
                            class: "input",
                            placeholder: "Search projects",
                            value: "{filter}",
                            oninput: move |e| filter.set(e.value()),
                        }
                    }
                    for (id, name, role) in options {
                        button {
                            key: "{id}",
                            class: if active_id.as_deref() == Some(id.as_str()) { "project-picker-item active" } else { "project-picker-item" },
                            onclick: {
                                let id = id.clone();
                                move |_| {
                                    ctx.switch_project(&id);
                                    open.set(false);
                                    filter.set(String::new());
                                }
                            },
                            span { "{name}" }
                            span { class: "project-picker-role", "{role}" }
                        }
                    }
                }
            }
        }
    }
}
