use crate::auth::{use_auth, use_permissions};
use crate::routes::NoProjectNotice;
use crate::session::{app_error, use_session};
use dioxus::prelude::*;
use shared_types::{ProjectMember, ProjectRole, ALL_ROLES};

/// Members of the active project with their roles. Managers can assign,
/// change and revoke roles.
#[component]
pub fn Members() -> Element {
    let ctx = use_session();
    let project = ctx.session.read().active_project().cloned();

    match project {
        Some(project) => {
            let id = project.id().to_string();
            let name = project.name().to_string();
            rsx! {
                MemberTable { key: "{id}", project_id: id.clone(), project_name: name }
            }
        }
        None if ctx.session.read().is_loaded() => rsx! { NoProjectNotice {} },
        None => rsx! { p { class: "muted", "Loading projects..." } },
    }
}

#[component]
fn MemberTable(project_id: String, project_name: String) -> Element {
    let ctx = use_session();
    let auth = use_auth();
    let can_manage = use_permissions().can_manage_members;
    let mut error: Signal<Option<String>> = use_signal(|| None);
    let mut new_user_id = use_signal(String::new);
    let mut new_role = use_signal(|| ProjectRole::Engineer);

    let list_id = project_id.clone();
    let mut members = use_resource(move || {
        let id = list_id.clone();
        async move { server::api::list_project_members(id).await }
    });

    let me = auth.current_user.read().as_ref().map(|u| u.id);

    let assign_id = project_id.clone();
    let assign = use_callback(move |(user_id, role): (i64, ProjectRole)| {
        let id = assign_id.clone();
        spawn(async move {
            match server::api::set_member_role(id, user_id, role).await {
                Ok(member) => {
                    tracing::info!(user_id = member.user_id, role = %role, "member role set");
                    error.set(None);
                    members.restart();
                    ctx.reload();
                }
                Err(e) => error.set(Some(app_error(&e).message)),
            }
        });
    });

    let remove_id = project_id.clone();
    let remove = use_callback(move |user_id: i64| {
        let id = remove_id.clone();
        spawn(async move {
            match server::api::remove_member(id, user_id).await {
                Ok(()) => {
                    tracing::info!(user_id, "member removed");
                    error.set(None);
                    members.restart();
                    ctx.reload();
                }
                Err(e) => error.set(Some(app_error(&e).message)),
            }
        });
    });

    let add_member = move |e: FormEvent| {
        e.prevent_default();
        match new_user_id.read().trim().parse::<i64>() {
            Ok(user_id) if user_id > 0 => assign.call((user_id, new_role())),
            _ => error.set(Some("Enter a numeric user id".to_string())),
        }
    };

    let rows: Vec<ProjectMember> = match &*members.read() {
        Some(Ok(list)) => list.clone(),
        _ => vec![],
    };
    let load_error = match &*members.read() {
        Some(Err(e)) => Some(app_error(e).message),
        _ => None,
    };
    let loading = members.read().is_none();

    rsx! {
        div { class: "page-header",
            h1 { "Members" }
            span { class: "muted", "{project_name}" }
        }

        if let Some(message) = error().or(load_error) {
            div { class: "banner banner-error", "{message}" }
        }

        if can_manage {
            form { class: "form form-inline", onsubmit: add_member,
                input {
                    class: "input",
                    placeholder: "User id",
                    value: "{new_user_id}",
                    oninput: move |e| new_user_id.set(e.value()),
                }
                RoleSelect {
                    value: Some(new_role()),
                    on_change: move |role| new_role.set(role),
                }
                button { r#type: "submit", class: "button", "Assign role" }
            }
        }

        if loading {
            p { class: "muted", "Loading members..." }
        } else {
            table { class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Username" }
                        th { "Email" }
                        th { "Role" }
                        if can_manage {
                            th {}
                        }
                    }
                }
                tbody {
                    for member in rows {
                        tr { key: "{member.user_id}",
                            td {
                                "{member.display_name}"
                                if me == Some(member.user_id) {
                                    span { class: "badge badge-outline", "You" }
                                }
                            }
                            td { "{member.username}" }
                            td { "{member.email}" }
                            td {
                                if can_manage {
                                    RoleSelect {
                                        value: member.role,
                                        on_change: move |role| assign.call((member.user_id, role)),
                                    }
                                } else {
                                    {member.role.map(|r| r.display_name()).unwrap_or("Unknown role")}
                                }
                            }
                            if can_manage {
                                td { class: "row-actions",
                                    button {
                                        class: "button button-ghost",
                                        onclick: move |_| remove.call(member.user_id),
                                        "Remove"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Dropdown over the role vocabulary. An unrecognized stored role shows
/// as an empty choice until a real role is picked. Roles carrying
/// capabilities the caller lacks are disabled; the server rejects them.
#[component]
fn RoleSelect(value: Option<ProjectRole>, on_change: EventHandler<ProjectRole>) -> Element {
    let own = use_permissions();
    let selected = value.map(|r| r.as_str()).unwrap_or("");
    rsx! {
        select {
            class: "input",
            value: "{selected}",
            onchange: move |e| {
                if let Some(role) = ProjectRole::parse(&e.value()) {
                    on_change.call(role);
                }
            },
            if value.is_none() {
                option { value: "", disabled: true, selected: true, "Unknown role" }
            }
            for role in ALL_ROLES.iter().copied() {
                option {
                    key: "{role}",
                    value: role.as_str(),
                    selected: value == Some(role),
                    disabled: !own.covers(&role.capabilities()),
                    {role.display_name()}
                }
            }
        }
    }
}
