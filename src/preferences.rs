use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{info, warn};

use crate::showcase::ThemeMode;

/// Remembers which theme mode a visitor last picked.
pub trait PreferenceStore {
    fn theme_mode(&self) -> Result<Option<ThemeMode>>;
    fn set_theme_mode(&self, mode: ThemeMode) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme_mode: Option<ThemeMode>,
}

/// Preferences kept as a small JSON document on disk.
pub struct JsonPreferenceStore {
    path: PathBuf,
    data: RwLock<Preferences>,
}

impl JsonPreferenceStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(action = "parse", component = "preferences", path = ?path, error = %e, "Ignoring unreadable preferences file");
                Preferences::default()
            })
        } else {
            Preferences::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &Preferences) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn theme_mode(&self) -> Result<Option<ThemeMode>> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        Ok(guard.theme_mode)
    }

    fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        guard.theme_mode = Some(mode);
        self.persist(&guard)?;
        info!(action = "save", component = "preferences", mode = ?mode, "Saved theme mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.theme_mode().unwrap(), None);
    }

    #[test]
    fn saved_mode_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = JsonPreferenceStore::open(path.clone()).unwrap();
        store.set_theme_mode(ThemeMode::Light).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"light\""));

        let reopened = JsonPreferenceStore::open(path).unwrap();
        assert_eq!(reopened.theme_mode().unwrap(), Some(ThemeMode::Light));
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonPreferenceStore::open(path).unwrap();
        assert_eq!(store.theme_mode().unwrap(), None);
    }
}
