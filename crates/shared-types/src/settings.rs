use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for the active project id.
pub const ACTIVE_PROJECT_KEY: &str = "sitebook.active_project_id";
/// Storage key for the sidebar collapse preference (`"true"` / `"false"`).
pub const SIDEBAR_COLLAPSED_KEY: &str = "sitebook.sidebar_collapsed";
/// Storage key for the interface language code.
pub const LANGUAGE_KEY: &str = "sitebook.language";

/// Durable client-side key/value storage.
///
/// Implemented over `localStorage` in the browser and by [`MemoryStore`] in
/// tests. Writes are fire-and-forget: the browser API cannot report failure
/// in a way the UI could act on.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process [`SettingsStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Interface language preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    It,
    En,
}

/// Every supported language, in picker order.
pub const ALL_LANGUAGES: &[Language] = &[Language::It, Language::En];

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::It => "Italiano",
            Language::En => "English",
        }
    }

    /// Parse a language code such as `"en"` or `"en-GB"`. Unknown codes
    /// fall back to the default language.
    pub fn from_code_or_default(code: &str) -> Self {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Language::En,
            "it" => Language::It,
            _ => Language::default(),
        }
    }
}

/// Typed view over the persisted client preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub active_project_id: Option<String>,
    pub sidebar_collapsed: bool,
    pub language: Language,
}

impl ClientSettings {
    /// Read all preferences. Missing or malformed entries take their
    /// default; an empty active-project entry counts as absent.
    pub fn load(store: &impl SettingsStore) -> Self {
        let active_project_id = store
            .get(ACTIVE_PROJECT_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let sidebar_collapsed = store
            .get(SIDEBAR_COLLAPSED_KEY)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let language = store
            .get(LANGUAGE_KEY)
            .map(|v| Language::from_code_or_default(&v))
            .unwrap_or_default();

        Self {
            active_project_id,
            sidebar_collapsed,
            language,
        }
    }

    /// Write every preference back to the store.
    pub fn save(&self, store: &mut impl SettingsStore) {
        Self::write_active_project(store, self.active_project_id.as_deref());
        Self::write_sidebar_collapsed(store, self.sidebar_collapsed);
        Self::write_language(store, self.language);
    }

    /// Persist (or clear, on `None`) the active project id.
    pub fn write_active_project(store: &mut impl SettingsStore, id: Option<&str>) {
        match id {
            Some(id) => store.set(ACTIVE_PROJECT_KEY, id),
            None => store.remove(ACTIVE_PROJECT_KEY),
        }
    }

    pub fn write_sidebar_collapsed(store: &mut impl SettingsStore, collapsed: bool) {
        store.set(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" });
    }

    pub fn write_language(store: &mut impl SettingsStore, language: Language) {
        store.set(LANGUAGE_KEY, language.code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_defaults() {
        let settings = ClientSettings::load(&MemoryStore::new());
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.language, Language::It);
        assert!(!settings.sidebar_collapsed);
        assert!(settings.active_project_id.is_none());
    }

    #[test]
    fn load_reads_all_three_keys() {
        let store = MemoryStore::with_entries([
            (ACTIVE_PROJECT_KEY, "p-42"),
            (SIDEBAR_COLLAPSED_KEY, "true"),
            (LANGUAGE_KEY, "en"),
        ]);
        let settings = ClientSettings::load(&store);
        assert_eq!(settings.active_project_id.as_deref(), Some("p-42"));
        assert!(settings.sidebar_collapsed);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn malformed_values_fall_back() {
        let store = MemoryStore::with_entries([
            (ACTIVE_PROJECT_KEY, "   "),
            (SIDEBAR_COLLAPSED_KEY, "yes"),
            (LANGUAGE_KEY, "klingon"),
        ]);
        assert_eq!(ClientSettings::load(&store), ClientSettings::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let mut store = MemoryStore::new();
        let settings = ClientSettings {
            active_project_id: Some("abc".into()),
            sidebar_collapsed: true,
            language: Language::En,
        };
        settings.save(&mut store);
        assert_eq!(store.get(SIDEBAR_COLLAPSED_KEY).as_deref(), Some("true"));
        assert_eq!(ClientSettings::load(&store), settings);
    }

    #[test]
    fn clearing_active_project_removes_the_key() {
        let mut store = MemoryStore::with_entries([(ACTIVE_PROJECT_KEY, "p1")]);
        ClientSettings::write_active_project(&mut store, None);
        assert_eq!(store.get(ACTIVE_PROJECT_KEY), None);
    }

    #[test]
    fn language_codes_accept_regions() {
        assert_eq!(Language::from_code_or_default("en-GB"), Language::En);
        assert_eq!(Language::from_code_or_default("IT_it"), Language::It);
        assert_eq!(Language::from_code_or_default(""), Language::It);
    }
}
