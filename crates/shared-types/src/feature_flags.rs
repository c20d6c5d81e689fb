use serde::{Deserialize, Serialize};

/// Feature flags read from `config.toml` at server startup.
///
/// Exposed to the UI through a server function. Every flag defaults to
/// `false`, so a missing or partial config file turns optional features off.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Export traces and logs over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Serve the OpenAPI reference UI at `/docs`.
    #[serde(default)]
    pub api_docs: bool,
}

/// Top-level structure of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}
