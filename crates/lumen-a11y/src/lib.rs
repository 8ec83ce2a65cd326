//! Lumen Accessibility Overlay
//!
//! User-configurable accessibility layer for a document surface.
//!
//! Features:
//! - Persisted accessibility settings with soft recovery
//! - One-way projection onto the document (contrast class, colour-vision
//!   mode attribute, font-size variable)
//! - Colour-vision simulation matrices and contrast checking
//! - Hover-to-speak reading controller with debounced, cancelable dispatch
//! - Speech backends (espeak-ng process, null)

pub mod settings;
pub mod storage;
pub mod settings_store;
pub mod applier;
pub mod filter;
pub mod speech;
pub mod timers;
pub mod extract;
pub mod reading;
pub mod config;
pub mod overlay;

pub use settings::{AccessibilitySettings, ColorBlindMode, FontSize};
pub use storage::{KeyValueStore, LocalStorage, MemoryStorage, StorageError};
pub use settings_store::{LoadOutcome, RecoveryReason, SettingsStore, SCHEMA_VERSION};
pub use applier::SettingsApplier;
pub use filter::{ColorFilter, ContrastChecker, HighContrastPalette};
pub use speech::{
    EspeakConfig, EspeakSpeech, NullSpeech, SpeechAdapter, SpeechBackend, SpeechError,
    Utterance, VoiceOptions,
};
pub use timers::{TimerId, TimerQueue};
pub use extract::{ReadableText, TextSource, readable_text};
pub use reading::{ReadingController, ReadingState, ReadingStats, ReadingStatus};
pub use config::OverlayConfig;
pub use overlay::AccessibilityOverlay;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Speech synthesis is not supported")]
    SpeechUnsupported,

    #[error("Unknown colour-blind mode: {0}")]
    UnknownColorBlindMode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),
}
