//! Overlay Configuration

use std::time::Duration;

use crate::speech::VoiceOptions;

/// Overlay configuration options
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Storage key of the settings record
    pub storage_key: String,

    /// Quiet period before a hovered element is spoken
    pub debounce: Duration,

    /// Exclusive upper bound on content text length, in characters
    pub max_readable_chars: usize,

    /// Voice used for every utterance
    pub voice: VoiceOptions,

    /// Tag selectors searched, in document order, for the activation announcement
    pub announce_selectors: Vec<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            storage_key: "accessibility-settings".to_string(),
            debounce: Duration::from_millis(50),
            max_readable_chars: 300,
            voice: VoiceOptions::default(),
            announce_selectors: vec!["h1".to_string(), "h2".to_string()],
        }
    }
}
