//! Settings Store
//!
//! Loads and saves the single `AccessibilitySettings` record. Loading never
//! fails: absent, malformed or unreadable records fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::settings::{AccessibilitySettings, ColorBlindMode, FontSize};
use crate::storage::{KeyValueStore, StorageError};

/// Version written with every saved record
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk shape of the record. Records written before versioning carry
/// no `version` field; absent fields take their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersistedRecord {
    version: Option<u32>,
    high_contrast: bool,
    color_blind_mode: ColorBlindMode,
    font_size: FontSize,
    text_to_speech: bool,
}

impl PersistedRecord {
    fn current(settings: &AccessibilitySettings) -> Self {
        Self {
            version: Some(SCHEMA_VERSION),
            high_contrast: settings.high_contrast,
            color_blind_mode: settings.color_blind_mode,
            font_size: settings.font_size,
            text_to_speech: settings.text_to_speech,
        }
    }

    fn settings(&self) -> AccessibilitySettings {
        AccessibilitySettings {
            high_contrast: self.high_contrast,
            color_blind_mode: self.color_blind_mode,
            font_size: self.font_size,
            text_to_speech: self.text_to_speech,
        }
    }
}

/// Why defaults were substituted for a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryReason {
    /// Not valid JSON or wrong shape
    Malformed(String),
    /// Written by a newer schema than this build understands
    UnsupportedVersion(u32),
}

/// How `load` obtained its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Missing,
    /// Current-schema record
    Loaded,
    /// Unversioned record from before schema versioning
    Legacy,
    /// Stored record unusable, defaults substituted
    Recovered(RecoveryReason),
}

/// Persists settings under a single well-known key
#[derive(Debug)]
pub struct SettingsStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(storage: S, key: &str) -> Self {
        Self { storage, key: key.to_string() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored settings, or defaults
    pub fn load(&self) -> AccessibilitySettings {
        self.load_with_outcome().0
    }

    /// Load the stored settings together with how they were obtained
    pub fn load_with_outcome(&self) -> (AccessibilitySettings, LoadOutcome) {
        let Some(raw) = self.storage.get_item(&self.key) else {
            tracing::debug!(key = %self.key, "no stored accessibility settings");
            return (AccessibilitySettings::default(), LoadOutcome::Missing);
        };

        let (settings, outcome) = match serde_json::from_str::<PersistedRecord>(&raw) {
            Ok(record) => match record.version {
                None => (record.settings(), LoadOutcome::Legacy),
                Some(v) if v <= SCHEMA_VERSION => (record.settings(), LoadOutcome::Loaded),
                Some(v) => (
                    AccessibilitySettings::default(),
                    LoadOutcome::Recovered(RecoveryReason::UnsupportedVersion(v)),
                ),
            },
            Err(e) => (
                AccessibilitySettings::default(),
                LoadOutcome::Recovered(RecoveryReason::Malformed(e.to_string())),
            ),
        };

        match &outcome {
            LoadOutcome::Recovered(reason) => {
                tracing::warn!(key = %self.key, ?reason, "stored accessibility settings unusable, using defaults");
            }
            _ => tracing::debug!(key = %self.key, ?outcome, ?settings, "loaded accessibility settings"),
        }
        (settings, outcome)
    }

    /// Overwrite the stored record
    pub fn save(&mut self, settings: &AccessibilitySettings) -> Result<(), StorageError> {
        let json = serde_json::to_string(&PersistedRecord::current(settings))?;
        self.storage.set_item(&self.key, &json)?;
        tracing::debug!(key = %self.key, ?settings, "saved accessibility settings");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const KEY: &str = "accessibility-settings";

    fn store_with(raw: &str) -> SettingsStore<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage.set_item(KEY, raw).unwrap();
        SettingsStore::new(storage, KEY)
    }

    #[test]
    fn test_missing_record_yields_defaults() {
        let store = SettingsStore::new(MemoryStorage::new(), KEY);
        let (settings, outcome) = store.load_with_outcome();
        assert_eq!(settings, AccessibilitySettings::default());
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[test]
    fn test_round_trip_every_mode() {
        let mut store = SettingsStore::new(MemoryStorage::new(), KEY);
        for mode in ColorBlindMode::ALL {
            let settings = AccessibilitySettings {
                high_contrast: true,
                color_blind_mode: mode,
                font_size: FontSize::new(22),
                text_to_speech: true,
            };
            store.save(&settings).unwrap();
            assert_eq!(store.load_with_outcome(), (settings, LoadOutcome::Loaded));
        }
    }

    #[test]
    fn test_round_trip_flags_and_bounds() {
        let mut store = SettingsStore::new(MemoryStorage::new(), KEY);
        for size in [10, 14, 24] {
            for (high_contrast, text_to_speech) in [(false, false), (true, false), (false, true)] {
                let settings = AccessibilitySettings {
                    high_contrast,
                    color_blind_mode: ColorBlindMode::Deuteranopia,
                    font_size: FontSize::new(size),
                    text_to_speech,
                };
                store.save(&settings).unwrap();
                assert_eq!(store.load_with_outcome(), (settings, LoadOutcome::Loaded));
            }
        }
    }

    #[test]
    fn test_saved_record_is_versioned() {
        let mut store = SettingsStore::new(MemoryStorage::new(), KEY);
        store.save(&AccessibilitySettings::default()).unwrap();
        let raw = store.storage().get_item(KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["fontSize"], 14);
    }

    #[test]
    fn test_legacy_record_is_accepted() {
        let store = store_with(
            r#"{"highContrast":true,"colorBlindMode":"protanopia","fontSize":18,"textToSpeech":false}"#,
        );
        let (settings, outcome) = store.load_with_outcome();
        assert_eq!(outcome, LoadOutcome::Legacy);
        assert!(settings.high_contrast);
        assert_eq!(settings.color_blind_mode, ColorBlindMode::Protanopia);
        assert_eq!(settings.font_size.get(), 18);
    }

    #[test]
    fn test_out_of_range_font_size_is_clamped() {
        let store = store_with(r#"{"version":1,"fontSize":3}"#);
        let settings = store.load();
        assert_eq!(settings.font_size.get(), 10);
    }

    #[test]
    fn test_missing_fields_default() {
        let store = store_with(r#"{"version":1,"highContrast":true}"#);
        let settings = store.load();
        assert!(settings.high_contrast);
        assert_eq!(settings.font_size, FontSize::DEFAULT);
    }

    #[test]
    fn test_malformed_records_recover() {
        for raw in [
            "{not json",
            "42",
            "null",
            r#"{"highContrast":"yes"}"#,
            r#"{"colorBlindMode":"sepia"}"#,
            r#"{"fontSize":14.5}"#,
        ] {
            let (settings, outcome) = store_with(raw).load_with_outcome();
            assert_eq!(settings, AccessibilitySettings::default(), "input {raw}");
            assert!(matches!(outcome, LoadOutcome::Recovered(RecoveryReason::Malformed(_))), "input {raw}");
        }
    }

    #[test]
    fn test_future_version_recovers() {
        let store = store_with(r#"{"version":7,"highContrast":true}"#);
        let (settings, outcome) = store.load_with_outcome();
        assert_eq!(settings, AccessibilitySettings::default());
        assert_eq!(outcome, LoadOutcome::Recovered(RecoveryReason::UnsupportedVersion(7)));
    }
}
