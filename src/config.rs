use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::Display;

use crate::internal::thread::Thread;
use crate::internal::ui::app::Action;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Thread selected at startup.
    pub default_thread: Thread,
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
    pub keybindings: KeyBindingConfig,
    /// Override for the preference file holding the theme. Defaults to the
    /// OS config directory.
    pub preferences_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Environment variables consulted, in order, for the provider token.
    pub credential_env: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            credential_env: vec!["GNEWS_API_KEY".to_string(), "NEWS_API_KEY".to_string()],
        }
    }
}

impl ApiConfig {
    /// Resolve the credential from the process environment.
    pub fn resolve_credential(&self) -> Option<SecretString> {
        self.resolve_credential_with(|name| std::env::var(name).ok())
    }

    /// Resolve the credential through `lookup`; the first non-empty value wins.
    /// There is no built-in fallback key.
    pub fn resolve_credential_with<F>(&self, lookup: F) -> Option<SecretString>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.credential_env
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(SecretString::from)
    }

    /// Human readable list of accepted variables for error messages.
    pub fn credential_hint(&self) -> String {
        match self.credential_env.len() {
            0 => "an API credential".to_string(),
            _ => self.credential_env.join(" or "),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Provider base URL; must end with a slash.
    pub base_url: String,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4/".to_string(),
            user_agent: format!("tui-news-app/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, Default)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Per-module overrides, e.g. `{"tui_news_app::api": Debug}`.
    pub module_levels: HashMap<String, LogLevel>,
    /// Directory for the rolling log file. Defaults to "logs".
    pub log_directory: Option<String>,
    /// Emit timing events for fetches and frame rendering.
    pub enable_performance_metrics: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            module_levels: HashMap::new(),
            log_directory: None,
            enable_performance_metrics: false,
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string built from the configured levels.
    pub fn filter_directive(&self) -> String {
        let mut filter = self.level.to_string();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));
        for (module, level) in modules {
            filter.push_str(&format!(",{}={}", module, level));
        }
        filter
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Interval between terminal event polls.
    pub tick_rate_ms: u64,
    pub show_source: bool,
    pub show_age: bool,
    pub padding: PaddingConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            show_source: true,
            show_age: true,
            padding: PaddingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct PaddingConfig {
    pub horizontal: u16,
    pub vertical: u16,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            horizontal: 1,
            vertical: 0,
        }
    }
}

/// Key overrides layered on top of the default bindings.
/// Keys use the `parse_key_str` syntax ("j", "Ctrl+C", "PageDown").
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub global: HashMap<String, Action>,
    pub feed: HashMap<String, Action>,
    pub help: HashMap<String, Action>,
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::error!("Failed to load config at {}: {:#}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).context("failed to parse config")
    }
}
