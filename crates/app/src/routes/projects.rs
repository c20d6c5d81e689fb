use crate::format_helpers::{
    date_input_value, format_date, format_working_week, parse_date_input, toggle_working_day,
    working_week_days,
};
use crate::routes::Route;
use crate::session::{app_error, use_session};
use dioxus::prelude::*;
use shared_types::{AccessibleProject, ProjectHoliday, ProjectRequest};
use std::collections::HashMap;

/// Projects page: every accessible project, a create form, and delete for
/// projects the caller manages. Each mutation reloads the session so the
/// active-project selection follows.
#[component]
pub fn Projects() -> Element {
    let ctx = use_session();
    let mut show_create = use_signal(|| false);
    let mut field_errors: Signal<HashMap<String, String>> = use_signal(HashMap::new);
    let mut error: Signal<Option<String>> = use_signal(|| None);
    let mut pending_delete: Signal<Option<AccessibleProject>> = use_signal(|| None);

    let projects = ctx.session.read().projects().to_vec();
    let active_id = ctx.session.read().active_project_id().map(str::to_string);
    let loaded = ctx.session.read().is_loaded();

    let handle_create = move |req: ProjectRequest| {
        spawn(async move {
            match server::api::create_project(req).await {
                Ok(created) => {
                    tracing::info!(project_id = %created.id(), "project created");
                    show_create.set(false);
                    field_errors.set(HashMap::new());
                    error.set(None);
                    ctx.reload();
                }
                Err(e) => {
                    let err = app_error(&e);
                    field_errors.set(err.field_errors.clone());
                    error.set(Some(err.message));
                }
            }
        });
    };

    let confirm_delete = move |_: MouseEvent| {
        let Some(target) = pending_delete.write().take() else {
            return;
        };
        spawn(async move {
            match server::api::delete_project(target.id().to_string()).await {
                Ok(()) => {
                    tracing::info!(project_id = %target.id(), "project deleted");
                    error.set(None);
                    ctx.reload();
                }
                Err(e) => error.set(Some(app_error(&e).message)),
            }
        });
    };

    rsx! {
        div { class: "page-header",
            h1 { "Projects" }
            button {
                class: "button",
                onclick: move |_| show_create.toggle(),
                if show_create() { "Cancel" } else { "New project" }
            }
        }

        if let Some(message) = error() {
            div { class: "banner banner-error", "{message}" }
        }

        if show_create() {
            section { class: "card",
                h2 { "New project" }
                ProjectForm {
                    initial: ProjectRequest::named(""),
                    field_errors: field_errors(),
                    submit_label: "Create project",
                    on_submit: handle_create,
                }
            }
        }

        if let Some(target) = pending_delete() {
            div { class: "dialog",
                p { {format!("Delete \"{}\"? Members and holidays are removed with it.", target.name())} }
                div { class: "dialog-actions",
                    button { class: "button button-ghost", onclick: move |_| pending_delete.set(None), "Cancel" }
                    button { class: "button button-destructive", onclick: confirm_delete, "Delete" }
                }
            }
        }

        if !loaded {
            p { class: "muted", "Loading projects..." }
        } else if projects.is_empty() {
            div { class: "empty-state",
                p { "You are not a member of any project yet." }
            }
        } else {
            table { class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Code" }
                        th { "Location" }
                        th { "Schedule" }
                        th { "Working week" }
                        th { "Your role" }
                        th {}
                    }
                }
                tbody {
                    for project in projects {
                        ProjectRow {
                            key: "{project.project.id}",
                            active: active_id.as_deref() == Some(project.id()),
                            project: project.clone(),
                            on_delete: move |p: AccessibleProject| pending_delete.set(Some(p)),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectRow(
    project: AccessibleProject,
    active: bool,
    on_delete: EventHandler<AccessibleProject>,
) -> Element {
    let mut ctx = use_session();
    let caps = project.capabilities();
    let info = project.project.clone();
    let id = info.id.clone();
    let role = project.role.map(|r| r.display_name()).unwrap_or("-");
    let schedule = format!(
        "{} - {}",
        format_date(info.start_date),
        format_date(info.end_date)
    );
    let week = format_working_week(&info.working_week);

    rsx! {
        tr { class: if active { "active" } else { "" },
            td {
                button {
                    class: "link-button",
                    onclick: {
                        let id = id.clone();
                        move |_| ctx.switch_project(&id)
                    },
                    "{info.name}"
                }
            }
            td { {info.code.clone().unwrap_or_default()} }
            td { {info.location.clone().unwrap_or_default()} }
            td { "{schedule}" }
            td { "{week}" }
            td { span { class: "badge", "{role}" } }
            td { class: "row-actions",
                if caps.can_manage_projects {
                    Link { to: Route::ProjectEdit { id: id.clone() }, class: "button button-ghost", "Edit" }
                    button {
                        class: "button button-ghost",
                        onclick: move |_| on_delete.call(project.clone()),
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Create/update form for a project, including its working calendar.
#[component]
pub fn ProjectForm(
    initial: ProjectRequest,
    field_errors: HashMap<String, String>,
    submit_label: &'static str,
    on_submit: EventHandler<ProjectRequest>,
) -> Element {
    let mut form = use_signal(|| initial.clone());
    let mut holiday_date = use_signal(String::new);
    let mut holiday_note = use_signal(String::new);
    let mut local_error: Signal<Option<String>> = use_signal(|| None);

    let current = form.read().clone();
    let days = working_week_days(&current.working_week);
    let weekly_hours = current.working_week.weekly_hours(current.hours_per_day);
    let name_error = field_errors.get("name").cloned();
    let hours_error = field_errors.get("hours_per_day").cloned();
    let schedule_error = field_errors.get("__all__").cloned();

    let add_holiday = move |_: MouseEvent| {
        let Some(date) = parse_date_input(&holiday_date.read()) else {
            local_error.set(Some("Pick a date for the holiday".to_string()));
            return;
        };
        let note = holiday_note.read().trim().to_string();
        let mut f = form.write();
        if f.holidays.iter().any(|h| h.date == date) {
            local_error.set(Some("That date is already a holiday".to_string()));
            return;
        }
        f.holidays.push(ProjectHoliday {
            date,
            description: (!note.is_empty()).then_some(note),
        });
        f.holidays.sort_by_key(|h| h.date);
        local_error.set(None);
        holiday_date.set(String::new());
        holiday_note.set(String::new());
    };

    let submit = move |e: FormEvent| {
        e.prevent_default();
        let req = form.read().clone();
        if !req.schedule_is_consistent() {
            local_error.set(Some("End date cannot be before the start date".to_string()));
            return;
        }
        local_error.set(None);
        on_submit.call(req);
    };

    rsx! {
        form { class: "form", onsubmit: submit,
            label { class: "form-field",
                span { "Name" }
                input {
                    class: "input",
                    required: true,
                    maxlength: "120",
                    value: "{current.name}",
                    oninput: move |e| form.write().name = e.value(),
                }
                if let Some(msg) = name_error {
                    span { class: "field-error", "{msg}" }
                }
            }
            div { class: "form-row",
                label { class: "form-field",
                    span { "Code" }
                    input {
                        class: "input",
                        value: {current.code.clone().unwrap_or_default()},
                        oninput: move |e| form.write().code = optional(e.value()),
                    }
                }
                label { class: "form-field",
                    span { "Location" }
                    input {
                        class: "input",
                        value: {current.location.clone().unwrap_or_default()},
                        oninput: move |e| form.write().location = optional(e.value()),
                    }
                }
            }
            label { class: "form-field",
                span { "Description" }
                textarea {
                    class: "input",
                    value: {current.description.clone().unwrap_or_default()},
                    oninput: move |e| form.write().description = optional(e.value()),
                }
            }
            div { class: "form-row",
                label { class: "form-field",
                    span { "Start date" }
                    input {
                        class: "input",
                        r#type: "date",
                        value: {date_input_value(current.start_date)},
                        oninput: move |e| form.write().start_date = parse_date_input(&e.value()),
                    }
                }
                label { class: "form-field",
                    span { "End date" }
                    input {
                        class: "input",
                        r#type: "date",
                        value: {date_input_value(current.end_date)},
                        oninput: move |e| form.write().end_date = parse_date_input(&e.value()),
                    }
                }
            }
            if let Some(msg) = schedule_error {
                span { class: "field-error", "{msg}" }
            }

            fieldset { class: "form-field",
                legend { "Working days" }
                div { class: "weekday-toggles",
                    for (index, (day, on)) in days.into_iter().enumerate() {
                        label { key: "{day}", class: "checkbox",
                            input {
                                r#type: "checkbox",
                                checked: on,
                                onchange: move |_| {
                                    let week = form.read().working_week;
                                    form.write().working_week = toggle_working_day(week, index);
                                },
                            }
                            "{day}"
                        }
                    }
                }
            }
            label { class: "form-field",
                span { "Hours per day" }
                input {
                    class: "input",
                    r#type: "number",
                    min: "0.5",
                    max: "24",
                    step: "0.5",
                    value: "{current.hours_per_day}",
                    oninput: move |e| {
                        if let Ok(hours) = e.value().parse::<f64>() {
                            form.write().hours_per_day = hours;
                        }
                    },
                }
                span { class: "muted", "{weekly_hours} hours per week" }
                if let Some(msg) = hours_error {
                    span { class: "field-error", "{msg}" }
                }
            }

            fieldset { class: "form-field",
                legend { "Holidays" }
                ul { class: "plain-list",
                    for (date, description) in current.holidays.iter().map(|h| (h.date, h.description.clone())) {
                        li { key: "{date}",
                            span { {format_date(Some(date))} }
                            if let Some(d) = description {
                                span { class: "muted", " {d}" }
                            }
                            button {
                                r#type: "button",
                                class: "button button-ghost",
                                onclick: move |_| form.write().holidays.retain(|h| h.date != date),
                                "Remove"
                            }
                        }
                    }
                }
                div { class: "form-row",
                    input {
                        class: "input",
                        r#type: "date",
                        value: "{holiday_date}",
                        oninput: move |e| holiday_date.set(e.value()),
                    }
                    input {
                        class: "input",
                        placeholder: "Description",
                        value: "{holiday_note}",
                        oninput: move |e| holiday_note.set(e.value()),
                    }
                    button { r#type: "button", class: "button button-ghost", onclick: add_holiday, "Add holiday" }
                }
            }

            if let Some(msg) = local_error() {
                div { class: "banner banner-error", "{msg}" }
            }
            button { r#type: "submit", class: "button", "{submit_label}" }
        }
    }
}

/// Blank text inputs are stored as absent.
fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
