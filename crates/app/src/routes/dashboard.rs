use crate::auth::{use_is_admin_class, use_is_field_role, use_permissions};
use crate::format_helpers::{capability_label, format_date, format_working_week};
use crate::routes::{NoProjectNotice, Route};
use crate::session::use_session;
use dioxus::prelude::*;
use shared_types::{working_days_between, ActiveProject, AccessibleProject};

/// Overview of the active project: schedule, calendar and what the caller
/// may do on it.
#[component]
pub fn Dashboard() -> Element {
    let ctx = use_session();
    let state = ctx.session.read().state().clone();

    match state {
        ActiveProject::Uninitialized => rsx! {
            div { class: "page-loading", "Loading projects..." }
        },
        ActiveProject::Empty => rsx! { NoProjectNotice {} },
        ActiveProject::Selected(project) => {
            let id = project.id().to_string();
            rsx! {
                ProjectOverview { key: "{id}", project }
            }
        }
    }
}

#[component]
fn ProjectOverview(project: AccessibleProject) -> Element {
    let caps = use_permissions();
    let admin_class = use_is_admin_class();
    let field_role = use_is_field_role();

    let project_id = project.id().to_string();
    let holidays = use_resource(move || {
        let id = project_id.clone();
        async move { server::api::list_project_holidays(id).await }
    });

    let info = &project.project;
    let working_week = format_working_week(&info.working_week);
    let weekly_hours = info.weekly_hours();
    let role_label = project.role.map(|r| r.display_name()).unwrap_or("No role");
    let granted = caps.granted();

    let holiday_dates: Vec<_> = match &*holidays.read() {
        Some(Ok(list)) => list.iter().map(|h| h.date).collect(),
        _ => vec![],
    };
    let planned_days = match (info.start_date, info.end_date) {
        (Some(start), Some(end)) => Some(working_days_between(
            start,
            end,
            &info.working_week,
            &holiday_dates,
        )),
        _ => None,
    };

    let holiday_view = match &*holidays.read() {
        None => rsx! { p { class: "muted", "Loading..." } },
        Some(Err(e)) => {
            let message = crate::session::app_error(e).message;
            rsx! { p { class: "banner banner-error", "{message}" } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "muted", "No holidays" } },
        Some(Ok(list)) => rsx! {
            ul { class: "plain-list",
                for h in list.iter() {
                    li { key: "{h.date}",
                        span { {format_date(Some(h.date))} }
                        if let Some(d) = h.description.as_ref() {
                            span { class: "muted", " {d}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "dashboard",
            section { class: "card",
                div { class: "card-header",
                    h2 { "{info.name}" }
                    if let Some(code) = info.code.as_ref() {
                        span { class: "badge badge-outline", "{code}" }
                    }
                    span { class: "badge", "{role_label}" }
                    if admin_class {
                        span { class: "badge badge-primary", "Management" }
                    }
                    if field_role {
                        span { class: "badge badge-secondary", "Field" }
                    }
                }
                if let Some(description) = info.description.as_ref() {
                    p { class: "card-description", "{description}" }
                }
                dl { class: "detail-grid",
                    dt { "Location" }
                    dd { {info.location.clone().unwrap_or_else(|| "-".to_string())} }
                    dt { "Start" }
                    dd { {format_date(info.start_date)} }
                    dt { "End" }
                    dd { {format_date(info.end_date)} }
                    dt { "Working week" }
                    dd { "{working_week}, {info.hours_per_day} h/day ({weekly_hours} h/week)" }
                    if let Some(days) = planned_days {
                        dt { "Planned working days" }
                        dd { "{days}" }
                    }
                }
            }

            section { class: "card",
                h3 { "Holidays" }
                {holiday_view}
            }

            section { class: "card",
                h3 { "Your permissions" }
                if granted.is_empty() {
                    p { class: "muted", "Read-only access on this project." }
                } else {
                    ul { class: "capability-list",
                        for cap in granted {
                            li { key: "{cap}", {capability_label(cap)} }
                        }
                    }
                }
                Link { to: Route::Roles {}, class: "card-link", "Compare roles" }
            }
        }
    }
}
