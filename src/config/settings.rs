//! Key-value settings source fed to [`resolve`](super::resolve).
//!
//! Settings are layered, later layers winning:
//! 1. `$XDG_CONFIG_HOME/llamit/config.toml` (platform config dir)
//! 2. `<repository>/.llamit.toml`
//! 3. `LLAMIT_*` environment variables
//! 4. explicit overrides from the command line (applied by the caller)

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SettingsError;

use super::{KEY_COMMIT_FORMAT, KEY_CUSTOM_FORMAT, KEY_MODEL, KEY_OLLAMA_URL};

/// Repository-local settings file name.
pub const REPO_SETTINGS_FILE: &str = ".llamit.toml";

/// Environment variables and the setting key each one overrides.
pub const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("LLAMIT_OLLAMA_URL", KEY_OLLAMA_URL),
    ("LLAMIT_MODEL", KEY_MODEL),
    ("LLAMIT_COMMIT_FORMAT", KEY_COMMIT_FORMAT),
    ("LLAMIT_CUSTOM_FORMAT", KEY_CUSTOM_FORMAT),
];

/// Raw settings as named options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut settings = Self::new();
        for (key, value) in pairs {
            settings.set(key, value);
        }
        settings
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a setting. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Overlay `other` on top of `self`; non-empty keys in `other` win.
    pub fn merge(&mut self, other: Settings) {
        self.values
            .extend(other.values.into_iter().filter(|(_, v)| !v.is_empty()));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// On-disk settings file shape.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(rename = "ollamaUrl")]
    ollama_url: Option<String>,
    model: Option<String>,
    #[serde(rename = "commitFormat")]
    commit_format: Option<String>,
    #[serde(rename = "customFormat")]
    custom_format: Option<String>,
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let mut settings = Settings::new();
        let fields = [
            (KEY_OLLAMA_URL, file.ollama_url),
            (KEY_MODEL, file.model),
            (KEY_COMMIT_FORMAT, file.commit_format),
            (KEY_CUSTOM_FORMAT, file.custom_format),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                settings.set(key, value);
            }
        }
        settings
    }
}

/// Path of the per-user settings file, if the platform has a config dir.
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("llamit").join("config.toml"))
}

/// Collect settings from files and environment for one invocation.
///
/// Unreadable or malformed files are logged and skipped.
pub fn load_settings(repository_root: Option<&Path>) -> Settings {
    let mut files = Vec::new();
    if let Some(path) = user_settings_path() {
        files.push(path);
    }
    if let Some(root) = repository_root {
        files.push(root.join(REPO_SETTINGS_FILE));
    }

    let mut settings = load_settings_files(&files);
    settings.merge(settings_from_env());
    settings
}

/// Read and layer the given settings files in order. Missing files are skipped.
pub fn load_settings_files(paths: &[PathBuf]) -> Settings {
    let mut settings = Settings::new();

    for path in paths {
        if !path.exists() {
            continue;
        }

        match read_settings_file(path) {
            Ok(layer) => {
                debug!("Loaded settings from {}", path.display());
                settings.merge(layer);
            }
            Err(e) => warn!("Ignoring settings file {}: {}", path.display(), e),
        }
    }

    settings
}

fn read_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: SettingsFile = toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(file.into())
}

/// Settings from `LLAMIT_*` environment variables.
pub fn settings_from_env() -> Settings {
    let mut settings = Settings::new();
    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            settings.set(key, value);
        }
    }
    settings
}
