use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the workspace root.
const CONFIG_PATH: &str = "config.toml";

/// Parse `config.toml` contents. Malformed input yields all-false defaults.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "failed to parse config, all feature flags off");
        AppConfig::default()
    })
}

/// Read `config.toml` and store its feature flags in the global `OnceLock`.
/// Only the first call has effect; a missing file turns every flag off.
pub fn load_feature_flags() -> &'static FeatureFlags {
    FLAGS.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(flags = ?config.features, "feature flags loaded");
            config.features
        }
        Err(e) => {
            tracing::info!(path = CONFIG_PATH, error = %e, "config not found, all feature flags off");
            FeatureFlags::default()
        }
    })
}

/// Loaded feature flags, or all-false defaults before `load_feature_flags()`.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        telemetry: false,
        api_docs: false,
    };
    FLAGS.get().unwrap_or(&DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_flags() {
        let config = parse_config("[features]\ntelemetry = true\napi_docs = true\n");
        assert!(config.features.telemetry);
        assert!(config.features.api_docs);
    }

    #[test]
    fn malformed_config_turns_everything_off() {
        let config = parse_config("[features\ntelemetry = ");
        assert_eq!(config.features, FeatureFlags::default());
    }
}
