use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::Display;
use tokio::sync::watch;
use tracing::info;

/// Storage key holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Only the exact literals "light" and "dark" are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// A string key-value slot store.
pub trait PreferenceStorage: Send {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent storage, used in tests and as a fallback when the
/// preference file cannot be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open `{config_dir}/tui-news-app/preferences.json`, creating the
    /// directory when needed.
    pub fn load_or_create() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("tui-news-app");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("Failed to create config directory {}", config_dir.display())
            })?;
            info!(config_dir = %config_dir.display(), "Created config directory for preferences");
        }

        Self::open(config_dir.join("preferences.json"))
    }

    /// Open a preference file at `path`. A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match path.exists() {
            true => {
                let content =
                    fs::read_to_string(&path).context("Failed to read preferences file")?;
                serde_json::from_str(&content).context("Failed to parse preferences file")?
            }
            false => BTreeMap::new(),
        };
        info!(preferences_file = %path.display(), "Opened preferences");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize preferences")?;
        fs::write(&self.path, content).with_context(|| {
            format!("Failed to write preferences file {}", self.path.display())
        })?;
        Ok(())
    }
}

/// Single owner of the theme preference.
///
/// Reads and writes go through this store; interested parties hold a
/// `watch::Receiver` obtained from [`ThemeStore::subscribe`] and are notified
/// of every change.
pub struct ThemeStore {
    preference: ThemePreference,
    storage: Box<dyn PreferenceStorage>,
    notifier: watch::Sender<ThemePreference>,
}

impl ThemeStore {
    /// Initialize from storage, falling back to light for absent or invalid values.
    pub fn load(storage: Box<dyn PreferenceStorage>) -> Self {
        let stored = storage.read(THEME_STORAGE_KEY);
        let preference = match stored.as_deref().and_then(ThemePreference::parse) {
            Some(pref) => pref,
            None => {
                if let Some(raw) = stored {
                    tracing::warn!(value = %raw, "Ignoring invalid stored theme preference");
                }
                ThemePreference::default()
            }
        };
        info!(theme = %preference, "Initialized theme store");

        let (notifier, _) = watch::channel(preference);
        Self {
            preference,
            storage,
            notifier,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemePreference> {
        self.notifier.subscribe()
    }

    /// Change the preference. Subscribers are notified even when persisting
    /// fails; the write error is returned to the caller.
    pub fn set(&mut self, preference: ThemePreference) -> Result<()> {
        if preference == self.preference {
            return Ok(());
        }

        self.preference = preference;
        self.notifier.send_replace(preference);
        self.storage
            .write(THEME_STORAGE_KEY, &preference.to_string())
            .context("Failed to persist theme preference")
    }

    pub fn toggle(&mut self) -> Result<ThemePreference> {
        let next = self.preference.toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn stored_value(&self) -> Option<String> {
        self.storage.read(THEME_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl PreferenceStorage for FailingStorage {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_defaults_to_light() {
        let store = ThemeStore::load(Box::new(MemoryStorage::new()));
        assert_eq!(store.preference(), ThemePreference::Light);
    }

    #[test]
    fn test_adopts_exact_stored_value() {
        let store = ThemeStore::load(Box::new(MemoryStorage::with_entry("theme", "dark")));
        assert_eq!(store.preference(), ThemePreference::Dark);
    }

    #[test]
    fn test_invalid_stored_value_falls_back() {
        for raw in ["Dark", "DARK", " dark", "blue", ""] {
            let store = ThemeStore::load(Box::new(MemoryStorage::with_entry("theme", raw)));
            assert_eq!(store.preference(), ThemePreference::Light, "{raw:?}");
        }
    }

    #[test]
    fn test_toggle_persists_and_notifies() {
        let mut store = ThemeStore::load(Box::new(MemoryStorage::new()));
        let mut rx = store.subscribe();

        assert_eq!(store.toggle().unwrap(), ThemePreference::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ThemePreference::Dark);
        assert_eq!(store.stored_value().as_deref(), Some("dark"));
    }

    #[test]
    fn test_double_toggle_restores_original() {
        let mut store = ThemeStore::load(Box::new(MemoryStorage::with_entry("theme", "light")));
        store.toggle().unwrap();
        store.toggle().unwrap();
        assert_eq!(store.preference(), ThemePreference::Light);
        assert_eq!(store.stored_value().as_deref(), Some("light"));
    }

    #[test]
    fn test_set_same_value_is_quiet() {
        let mut store = ThemeStore::load(Box::new(MemoryStorage::new()));
        let rx = store.subscribe();
        store.set(ThemePreference::Light).unwrap();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.stored_value(), None);
    }

    #[test]
    fn test_write_failure_still_applies() {
        let mut store = ThemeStore::load(Box::new(FailingStorage));
        let rx = store.subscribe();
        assert!(store.toggle().is_err());
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(*rx.borrow(), ThemePreference::Dark);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = ThemeStore::load(Box::new(FileStorage::open(&path).unwrap()));
        store.toggle().unwrap();

        let reopened = ThemeStore::load(Box::new(FileStorage::open(&path).unwrap()));
        assert_eq!(reopened.preference(), ThemePreference::Dark);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStorage::open(&path).is_err());
    }
}
