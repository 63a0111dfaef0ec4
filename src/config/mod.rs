//! Settings and configuration resolution.

pub mod format;
pub mod settings;

use serde::Serialize;

pub use format::CommitFormat;
pub use settings::{Settings, load_settings};

/// Setting key for the Ollama generate endpoint.
pub const KEY_OLLAMA_URL: &str = "ollamaUrl";
/// Setting key for the model identifier.
pub const KEY_MODEL: &str = "model";
/// Setting key for the commit message format name.
pub const KEY_COMMIT_FORMAT: &str = "commitFormat";
/// Setting key for the custom template text.
pub const KEY_CUSTOM_FORMAT: &str = "customFormat";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "qwen3-coder:30b";

/// Fully resolved configuration for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub backend_url: String,
    pub model: String,
    pub commit_format: CommitFormat,
    /// Only used when `commit_format` is [`CommitFormat::Custom`].
    pub custom_template: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            commit_format: CommitFormat::Conventional,
            custom_template: String::new(),
        }
    }
}

impl Configuration {
    /// The custom template, if it takes effect for this configuration.
    pub fn effective_custom_template(&self) -> Option<&str> {
        match self.commit_format {
            CommitFormat::Custom if !self.custom_template.is_empty() => {
                Some(&self.custom_template)
            }
            _ => None,
        }
    }
}

/// Merge defaults with the overrides present in `settings`.
///
/// Any present, non-empty override replaces the default verbatim. Nothing is
/// validated here; a malformed URL surfaces later as a backend failure.
pub fn resolve(settings: &Settings) -> Configuration {
    let defaults = Configuration::default();

    Configuration {
        backend_url: settings
            .get(KEY_OLLAMA_URL)
            .map(str::to_string)
            .unwrap_or(defaults.backend_url),
        model: settings
            .get(KEY_MODEL)
            .map(str::to_string)
            .unwrap_or(defaults.model),
        commit_format: settings
            .get(KEY_COMMIT_FORMAT)
            .map(CommitFormat::from_name)
            .unwrap_or(defaults.commit_format),
        custom_template: settings
            .get(KEY_CUSTOM_FORMAT)
            .map(str::to_string)
            .unwrap_or(defaults.custom_template),
    }
}
