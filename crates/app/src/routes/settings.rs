use crate::routes::NoProjectNotice;
use crate::session::{app_error, use_session};
use dioxus::prelude::*;
use shared_types::{Language, ALL_LANGUAGES};

/// Interface preferences. Needs can-access-settings on the active project,
/// checked against the server's resolution for that project.
#[component]
pub fn Settings() -> Element {
    let ctx = use_session();
    let active_id = ctx.session.read().active_project_id().map(str::to_string);

    match active_id {
        Some(id) => rsx! { SettingsGate { key: "{id}", project_id: id.clone() } },
        None if ctx.session.read().is_loaded() => rsx! { NoProjectNotice {} },
        None => rsx! { p { class: "muted", "Loading projects..." } },
    }
}

#[component]
fn SettingsGate(project_id: String) -> Element {
    let access = use_resource(move || {
        let id = project_id.clone();
        async move { server::api::get_project_capabilities(id).await }
    });

    let view = match &*access.read() {
        None => rsx! { p { class: "muted", "Checking access..." } },
        Some(Err(e)) => {
            let message = app_error(e).message;
            rsx! { div { class: "banner banner-error", "{message}" } }
        }
        Some(Ok(caps)) if !caps.capabilities.can_access_settings => rsx! {
            div { class: "empty-state",
                h2 { "Settings unavailable" }
                p { "Your role on this project does not include access to settings." }
            }
        },
        Some(Ok(_)) => rsx! { Preferences {} },
    };
    view
}

#[component]
fn Preferences() -> Element {
    let mut ctx = use_session();
    let settings = ctx.session.read().settings().clone();

    rsx! {
        div { class: "page-header",
            h1 { "Settings" }
        }
        section { class: "card",
            h2 { "Interface" }
            label { class: "form-field",
                span { "Language" }
                select {
                    class: "input",
                    value: settings.language.code(),
                    onchange: move |e| ctx.set_language(Language::from_code_or_default(&e.value())),
                    for language in ALL_LANGUAGES.iter().copied() {
                        option {
                            key: "{language:?}",
                            value: language.code(),
                            selected: language == settings.language,
                            {language.display_name()}
                        }
                    }
                }
            }
            label { class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: settings.sidebar_collapsed,
                    onchange: move |e| ctx.set_sidebar_collapsed(e.checked()),
                }
                "Collapse the sidebar"
            }
            p { class: "muted",
                "Preferences are stored in this browser and restored at the next sign-in."
            }
        }
    }
}
