use crate::auth::use_active_role;
use crate::format_helpers::capability_label;
use crate::session::app_error;
use dioxus::prelude::*;
use shared_types::ALL_CAPABILITIES;

/// The role vocabulary and what each role may do.
#[component]
pub fn Roles() -> Element {
    let active = use_active_role();
    let roles = use_server_future(move || async move { server::api::list_roles().await })?;

    let body = match &*roles.read() {
        None => rsx! { p { class: "muted", "Loading roles..." } },
        Some(Err(e)) => {
            let message = app_error(e).message;
            rsx! { div { class: "banner banner-error", "{message}" } }
        }
        Some(Ok(list)) => rsx! {
            div { class: "table-scroll",
                table { class: "table capability-matrix",
                    thead {
                        tr {
                            th { "Role" }
                            for cap in ALL_CAPABILITIES.iter().copied() {
                                th { key: "{cap}", title: "{cap}", {capability_label(cap)} }
                            }
                        }
                    }
                    tbody {
                        for row in list.iter().cloned() {
                            tr {
                                key: "{row.role}",
                                class: if active == Some(row.role) { "active" } else { "" },
                                td {
                                    "{row.label}"
                                    if row.admin_class {
                                        span { class: "badge badge-primary", "Management" }
                                    }
                                    if row.field_role {
                                        span { class: "badge badge-secondary", "Field" }
                                    }
                                }
                                for cap in ALL_CAPABILITIES.iter().copied() {
                                    td {
                                        key: "{cap}",
                                        class: "cell-center",
                                        if row.capabilities.allows(cap) { "\u{2713}" } else { "" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "page-header",
            h1 { "Roles" }
            if let Some(role) = active {
                span { class: "muted", {format!("Your role on the active project: {}", role.display_name())} }
            }
        }
        {body}
    }
}
