pub mod dashboard;
pub mod members;
pub mod not_found;
pub mod project_edit;
pub mod project_picker;
pub mod projects;
pub mod roles;
pub mod settings;

use crate::auth::{use_auth, use_sidebar_visibility};
use crate::session::use_session;
use crate::ProfileState;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdBriefcase, LdFolder, LdLayoutDashboard, LdSettings, LdShield, LdUsers,
};
use dioxus_free_icons::Icon;
use shared_types::FeatureFlags;

use dashboard::Dashboard;
use members::Members;
use not_found::NotFound;
use project_edit::ProjectEdit;
use project_picker::ProjectPicker;
use projects::Projects;
use roles::Roles;
use settings::Settings;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[layout(AuthGuard)]
    #[layout(AppLayout)]
    #[route("/")]
    Dashboard {},
    #[route("/projects")]
    Projects {},
    #[route("/projects/:id")]
    ProjectEdit { id: String },
    #[route("/members")]
    Members {},
    #[route("/roles")]
    Roles {},
    #[route("/settings")]
    Settings {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Auth guard layout. Sessions come from an externally issued access
/// cookie, so an anonymous visitor gets a notice instead of a login form.
///
/// `use_server_future` with `?` suspends during SSR until the auth check
/// completes; the resolved user is embedded for hydration.
#[component]
fn AuthGuard() -> Element {
    let mut auth = use_auth();

    let resource = use_server_future(move || async move { server::api::get_current_user().await })?;

    let result = resource.read().as_ref().cloned();

    match result {
        Some(Ok(Some(user))) => {
            let same_user = auth.current_user.read().as_ref().map(|u| u.id) == Some(user.id);
            if !same_user {
                auth.set_user(user);
            }
            rsx! { Outlet::<Route> {} }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            if auth.is_authenticated() {
                auth.clear_auth();
            }
            rsx! {
                div { class: "auth-guard-loading",
                    h2 { "Sign-in required" }
                    p { "Your session has expired or you are not signed in." }
                }
            }
        }
        None => {
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Loading..." }
                }
            }
        }
    }
}

/// Main app layout with sidebar and top navbar.
#[component]
fn AppLayout() -> Element {
    let route: Route = use_route();
    let profile: ProfileState = use_context();
    let flags: FeatureFlags = use_context();
    let mut auth = use_auth();
    let mut ctx = use_session();

    let vis = use_sidebar_visibility();
    let collapsed = ctx.session.read().settings().sidebar_collapsed;
    let active_id = ctx.session.read().active_project_id().map(str::to_string);

    let page_title = match &route {
        Route::Dashboard {} => "Dashboard",
        Route::Projects {} | Route::ProjectEdit { .. } => "Projects",
        Route::Members {} => "Members",
        Route::Roles {} => "Roles",
        Route::Settings {} => "Settings",
        Route::NotFound { .. } => "",
    };

    let display_name = profile.display_name.read().clone();
    let email = profile.email.read().clone();
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase();

    rsx! {
        div { class: if collapsed { "app-shell sidebar-collapsed" } else { "app-shell" },
            nav { class: "sidebar",
                div { class: "sidebar-brand",
                    span { class: "sidebar-brand-name", "Sitebook" }
                }
                ProjectPicker {}

                div { class: "sidebar-group",
                    span { class: "sidebar-group-label", "Core" }
                    SidebarLink {
                        to: Route::Dashboard {},
                        active: matches!(route, Route::Dashboard {}),
                        label: "Dashboard",
                        Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 18, height: 18 }
                    }
                    SidebarLink {
                        to: Route::Projects {},
                        active: matches!(route, Route::Projects {}),
                        label: "Projects",
                        Icon::<LdFolder> { icon: LdFolder, width: 18, height: 18 }
                    }
                    SidebarLink {
                        to: Route::Roles {},
                        active: matches!(route, Route::Roles {}),
                        label: "Roles",
                        Icon::<LdShield> { icon: LdShield, width: 18, height: 18 }
                    }
                }

                if vis.team {
                    div { class: "sidebar-group",
                        span { class: "sidebar-group-label", "Team" }
                        SidebarLink {
                            to: Route::Members {},
                            active: matches!(route, Route::Members {}),
                            label: "Members",
                            Icon::<LdUsers> { icon: LdUsers, width: 18, height: 18 }
                        }
                    }
                }

                if vis.administration {
                    if let Some(id) = active_id.clone() {
                        div { class: "sidebar-group",
                            span { class: "sidebar-group-label", "Administration" }
                            SidebarLink {
                                to: Route::ProjectEdit { id: id.clone() },
                                active: matches!(&route, Route::ProjectEdit { id: current } if *current == id),
                                label: "Project details",
                                Icon::<LdBriefcase> { icon: LdBriefcase, width: 18, height: 18 }
                            }
                        }
                    }
                }

                if vis.settings {
                    div { class: "sidebar-group",
                        span { class: "sidebar-group-label", "Preferences" }
                        SidebarLink {
                            to: Route::Settings {},
                            active: matches!(route, Route::Settings {}),
                            label: "Settings",
                            Icon::<LdSettings> { icon: LdSettings, width: 18, height: 18 }
                        }
                    }
                }

                div { class: "sidebar-footer",
                    button {
                        class: "sidebar-collapse-toggle",
                        title: if collapsed { "Expand sidebar" } else { "Collapse sidebar" },
                        onclick: move |_| ctx.set_sidebar_collapsed(!collapsed),
                        if collapsed { "\u{00BB}" } else { "\u{00AB}" }
                    }
                }
            }

            div { class: "sidebar-inset",
                header { class: "navbar-bar",
                    span { class: "navbar-title", "{page_title}" }
                    div { class: "navbar-spacer" }
                    if flags.api_docs {
                        a { class: "navbar-link", href: "/docs", "API Docs" }
                    }
                    div { class: "navbar-user", title: "{email}",
                        span { class: "avatar", "{initials}" }
                        span { class: "navbar-user-name", "{display_name}" }
                    }
                    button {
                        class: "button button-ghost",
                        onclick: move |_| {
                            spawn(async move {
                                if let Err(e) = server::api::logout().await {
                                    tracing::warn!(error = %e, "logout request failed");
                                }
                            });
                            ctx.end();
                            auth.clear_auth();
                        },
                        "Sign Out"
                    }
                }

                if let Some(err) = ctx.last_error.read().as_ref() {
                    div { class: "banner banner-error", "{err.message}" }
                }

                main { class: "page-content",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

/// One sidebar entry: icon plus label, the label hidden when collapsed.
#[component]
fn SidebarLink(to: Route, active: bool, label: &'static str, children: Element) -> Element {
    rsx! {
        Link {
            to,
            class: if active { "sidebar-link active" } else { "sidebar-link" },
            {children}
            span { class: "sidebar-link-label", "{label}" }
        }
    }
}

/// Shown by project-scoped pages while the user has no projects.
#[component]
pub fn NoProjectNotice() -> Element {
    rsx! {
        div { class: "empty-state",
            h2 { "No projects yet" }
            p { "Create a project to start assigning roles." }
            Link { to: Route::Projects {}, class: "button", "Go to Projects" }
        }
    }
}
