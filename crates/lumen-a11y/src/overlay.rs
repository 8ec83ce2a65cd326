//! Accessibility Overlay
//!
//! The settings API the menu calls. Every operation persists the whole
//! record, projects it onto the document, then brings the reading
//! controller in line with the text-to-speech flag.

use std::time::Duration;

use lumen_dom::{Document, DomEvent};

use crate::applier::SettingsApplier;
use crate::config::OverlayConfig;
use crate::reading::{ReadingController, ReadingStatus};
use crate::settings::{AccessibilitySettings, ColorBlindMode, FontSize};
use crate::settings_store::SettingsStore;
use crate::speech::{SpeechAdapter, SpeechBackend};
use crate::storage::KeyValueStore;
use crate::A11yError;

/// Accessibility overlay bound to one document
#[derive(Debug)]
pub struct AccessibilityOverlay<S: KeyValueStore, B: SpeechBackend> {
    settings: AccessibilitySettings,
    store: SettingsStore<S>,
    reader: ReadingController<B>,
}

impl<S: KeyValueStore, B: SpeechBackend> AccessibilityOverlay<S, B> {
    /// Load stored settings, project them and resume reading if it was on
    pub fn attach(document: &mut Document, storage: S, speech: B, config: OverlayConfig) -> Self {
        let store = SettingsStore::new(storage, &config.storage_key);
        let settings = store.load();
        let speech = SpeechAdapter::new(speech, config.voice.clone());
        let reader = ReadingController::new(speech, &config);

        let mut overlay = Self { settings, store, reader };
        overlay.project(document);
        tracing::info!(settings = ?overlay.settings, status = ?overlay.reading_status(), "accessibility overlay attached");
        overlay
    }

    pub fn settings(&self) -> &AccessibilitySettings {
        &self.settings
    }

    pub fn reading_status(&self) -> ReadingStatus {
        self.reader.status()
    }

    /// Cached speech capability; drives whether the reading toggle is enabled
    pub fn speech_supported(&self) -> bool {
        self.reader.is_supported()
    }

    pub fn reader(&self) -> &ReadingController<B> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut ReadingController<B> {
        &mut self.reader
    }

    pub fn store(&self) -> &SettingsStore<S> {
        &self.store
    }

    pub fn toggle_high_contrast(&mut self, document: &mut Document) {
        let next = self.settings.with_high_contrast(!self.settings.high_contrast);
        self.commit(document, next);
    }

    pub fn set_color_blind_mode(&mut self, document: &mut Document, mode: ColorBlindMode) {
        let next = self.settings.with_color_blind_mode(mode);
        self.commit(document, next);
    }

    /// Set the font size, clamped to `[FontSize::MIN, FontSize::MAX]`
    pub fn set_font_size(&mut self, document: &mut Document, size: i64) {
        let next = self.settings.with_font_size(FontSize::new(size));
        self.commit(document, next);
    }

    pub fn increase_font_size(&mut self, document: &mut Document) {
        let next = self.settings.with_font_size(self.settings.font_size.increased());
        self.commit(document, next);
    }

    pub fn decrease_font_size(&mut self, document: &mut Document) {
        let next = self.settings.with_font_size(self.settings.font_size.decreased());
        self.commit(document, next);
    }

    pub fn reset_font_size(&mut self, document: &mut Document) {
        let next = self.settings.with_font_size(FontSize::DEFAULT);
        self.commit(document, next);
    }

    /// Flip the text-to-speech flag; reading starts or stops to match.
    ///
    /// Without speech support the flag is still stored and the status is
    /// `Unsupported`.
    pub fn toggle_text_to_speech(&mut self, document: &mut Document) -> ReadingStatus {
        let next = self.settings.with_text_to_speech(!self.settings.text_to_speech);
        self.commit(document, next)
    }

    /// Write the current settings to storage
    pub fn persist(&mut self) -> Result<(), A11yError> {
        self.store.save(&self.settings)?;
        Ok(())
    }

    /// Deliver a pointer event to the document
    pub fn handle_event(&self, document: &Document, event: &DomEvent) -> usize {
        document.dispatch_event(event)
    }

    /// Fire debounced dispatches due at `now`
    pub fn poll(&mut self, now: Duration) -> usize {
        self.reader.poll(now)
    }

    /// Stop reading and release the document listener
    pub fn detach(mut self) -> S {
        self.reader.stop();
        tracing::info!("accessibility overlay detached");
        let Self { store, .. } = self;
        store.into_storage()
    }

    fn commit(&mut self, document: &mut Document, settings: AccessibilitySettings) -> ReadingStatus {
        self.settings = settings;
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist accessibility settings");
        }
        self.project(document)
    }

    fn project(&mut self, document: &mut Document) -> ReadingStatus {
        if let Err(e) = SettingsApplier::apply(document, &self.settings) {
            tracing::warn!(error = %e, "failed to apply accessibility settings");
        }
        self.reader.sync(self.settings.text_to_speech, document)
    }
}
