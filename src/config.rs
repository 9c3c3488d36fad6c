//! Editor configuration
//!
//! Read from `~/.config/kestrel/config.yaml`; every field has a default so a
//! partial file is fine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Language server launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageServerConfig {
    /// Executable, looked up on `PATH`
    #[serde(default = "default_server_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Set to false to never start a server
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for LanguageServerConfig {
    fn default() -> Self {
        Self {
            command: default_server_command(),
            args: Vec::new(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Spaces per indent level; tabs are expanded to this on load
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Quiet period before asking the plugin for a line prediction
    #[serde(default = "default_prediction_debounce_ms")]
    pub prediction_debounce_ms: u64,

    /// Wasm plugin module, relative to the working directory
    #[serde(default = "default_plugin_path")]
    pub plugin_path: PathBuf,

    #[serde(default)]
    pub language_server: LanguageServerConfig,

    #[serde(default = "default_true")]
    pub completion_enabled: bool,

    #[serde(default = "default_true")]
    pub show_line_numbers: bool,

    /// File name suffixes whose indentation is saved as tabs
    #[serde(default = "default_tabs_on_save")]
    pub tabs_on_save: Vec<String>,

    /// Shell for the terminal shortcut
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_tab_width() -> usize {
    4
}

fn default_prediction_debounce_ms() -> u64 {
    500
}

fn default_plugin_path() -> PathBuf {
    PathBuf::from("plugin.wasm")
}

fn default_server_command() -> String {
    "gopls".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tabs_on_save() -> Vec<String> {
    [".go", "go.mod", "Makefile", ".mk"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            prediction_debounce_ms: default_prediction_debounce_ms(),
            plugin_path: default_plugin_path(),
            language_server: LanguageServerConfig::default(),
            completion_enabled: true,
            show_line_numbers: true,
            tabs_on_save: default_tabs_on_save(),
            shell: default_shell(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
