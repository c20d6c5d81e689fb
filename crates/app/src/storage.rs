use dioxus::prelude::*;
use shared_types::{SettingsStore, ACTIVE_PROJECT_KEY, LANGUAGE_KEY, SIDEBAR_COLLAPSED_KEY};
use std::collections::HashMap;

/// Keys read from `localStorage` at startup.
const PERSISTED_KEYS: [&str; 3] = [ACTIVE_PROJECT_KEY, SIDEBAR_COLLAPSED_KEY, LANGUAGE_KEY];

/// [`SettingsStore`] backed by the browser's `localStorage`.
///
/// `localStorage` is only reachable through async `eval`, so the store keeps
/// an in-memory copy: it is filled once by [`BrowserStore::hydrate`] and
/// every write updates the copy and is pushed to the browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserStore {
    cache: HashMap<String, String>,
}

impl BrowserStore {
    /// Read the persisted keys from `localStorage`. Outside a browser (SSR,
    /// eval failure) this yields an empty store and defaults apply.
    pub async fn hydrate() -> Self {
        match document::eval(&read_items_script(&PERSISTED_KEYS))
            .join::<HashMap<String, String>>()
            .await
        {
            Ok(cache) => Self { cache },
            Err(e) => {
                tracing::warn!(error = ?e, "localStorage unavailable, using default settings");
                Self::default()
            }
        }
    }

    fn push(script: String) {
        // Fire and forget; the cached value is authoritative for this session.
        let _ = document::eval(&script);
    }
}

impl SettingsStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.cache.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.cache.insert(key.to_string(), value.to_string());
        Self::push(set_item_script(key, value));
    }

    fn remove(&mut self, key: &str) {
        if self.cache.remove(key).is_some() {
            Self::push(remove_item_script(key));
        }
    }
}

/// Quote a value as a JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn read_items_script(keys: &[&str]) -> String {
    let keys: Vec<String> = keys.iter().map(|k| js_string(k)).collect();
    format!(
        "const out = {{}};\n\
         for (const key of [{}]) {{\n\
         \x20 const value = window.localStorage.getItem(key);\n\
         \x20 if (value !== null) out[key] = value;\n\
         }}\n\
         return out;",
        keys.join(", ")
    )
}

fn set_item_script(key: &str, value: &str) -> String {
    format!(
        "window.localStorage.setItem({}, {});",
        js_string(key),
        js_string(value)
    )
}

fn remove_item_script(key: &str) -> String {
    format!("window.localStorage.removeItem({});", js_string(key))
}
