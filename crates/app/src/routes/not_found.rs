use dioxus::prelude::*;

use crate::routes::Route;

/// Fallback for unknown paths.
#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = format!("/{}", route.join("/"));

    rsx! {
        div { class: "empty-state empty-state-page",
            span { class: "empty-state-code", "404" }
            h1 { "Nothing here" }
            p { "No page matches " code { "{path}" } "." }
            div { class: "dialog-actions",
                Link { to: Route::Dashboard {}, class: "button", "Dashboard" }
                Link { to: Route::Projects {}, class: "button button-ghost", "Projects" }
            }
        }
    }
}
