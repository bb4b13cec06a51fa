use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::{SettingsStorage, SourceError, StorageArea};
use crate::hotkey::{Chord, ChordError, Platform};

/// Key of the settings record in synchronized storage.
pub const SETTINGS_STORAGE_KEY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub shortcut: String,
}

impl Settings {
    pub fn default_for(platform: Platform) -> Self {
        let shortcut = match platform {
            Platform::Apple => "Command+Shift+K",
            Platform::Other => "Ctrl+Shift+K",
        };
        Self {
            shortcut: shortcut.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::default_for(Platform::current())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid shortcut: {0}")]
    InvalidShortcut(#[from] ChordError),
    #[error("shortcut must include at least one modifier")]
    MissingModifier,
    #[error("storage error: {0}")]
    Storage(#[from] SourceError),
    #[error("stored settings are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Canonical form of a user-entered shortcut, e.g. `shift+ctrl+k` -> `Ctrl+Shift+K`.
pub fn validate_shortcut(input: &str) -> Result<String, SettingsError> {
    let chord = Chord::parse(input)?;
    if !chord.has_modifier() {
        return Err(SettingsError::MissingModifier);
    }
    Ok(chord.to_string())
}

/// Reads the settings record. A missing record yields the platform default.
pub async fn load<S: SettingsStorage>(storage: &S) -> Result<Settings, SettingsError> {
    match storage.get(StorageArea::Sync, SETTINGS_STORAGE_KEY).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Settings::default()),
    }
}

/// Like [`load`], but any failure degrades to the default record.
pub async fn load_or_default<S: SettingsStorage>(storage: &S) -> Settings {
    match load(storage).await {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(event = "settings_load_failed", %error, "falling back to default settings");
            Settings::default()
        }
    }
}

pub async fn save<S: SettingsStorage>(storage: &S, settings: &Settings) -> Result<Settings, SettingsError> {
    let canonical = Settings {
        shortcut: validate_shortcut(&settings.shortcut)?,
    };
    storage
        .set(
            StorageArea::Sync,
            SETTINGS_STORAGE_KEY,
            serde_json::to_value(&canonical)?,
        )
        .await?;
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_defaults() {
        assert_eq!(Settings::default_for(Platform::Other).shortcut, "Ctrl+Shift+K");
        assert_eq!(Settings::default_for(Platform::Apple).shortcut, "Command+Shift+K");
    }

    #[test]
    fn validates_and_canonicalizes_shortcut() {
        assert_eq!(validate_shortcut(" shift + ctrl + p ").unwrap(), "Ctrl+Shift+P");
    }

    #[test]
    fn rejects_shortcut_without_modifier() {
        assert!(matches!(
            validate_shortcut("K"),
            Err(SettingsError::MissingModifier)
        ));
    }
}
