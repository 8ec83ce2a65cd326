//! Speech Synthesis
//!
//! `SpeechBackend` is the platform capability; `SpeechAdapter` wraps it with
//! a cached support probe, text normalization and replace-on-speak semantics.

mod espeak;

pub use espeak::{EspeakConfig, EspeakSpeech};

/// Speech error
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech synthesis is not supported")]
    Unsupported,

    #[error("failed to start speech process: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Voice parameters for an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    /// BCP 47 language tag
    pub language: String,
    /// 1.0 = normal speed
    pub rate: f32,
    /// 1.0 = normal pitch
    pub pitch: f32,
    /// 0.0 - 1.0
    pub volume: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self { language: "pt-BR".into(), rate: 0.9, pitch: 1.0, volume: 1.0 }
    }
}

/// One unit of text submitted for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceOptions,
}

/// Platform speech capability
pub trait SpeechBackend {
    /// Capability probe
    fn is_supported(&self) -> bool;

    /// Start speaking. Callers cancel any previous utterance first.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop any in-progress or queued utterance. Safe when idle.
    fn cancel(&mut self);

    fn is_speaking(&mut self) -> bool {
        false
    }
}

impl<B: SpeechBackend + ?Sized> SpeechBackend for Box<B> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        (**self).speak(utterance)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn is_speaking(&mut self) -> bool {
        (**self).is_speaking()
    }
}

/// Backend for environments without speech synthesis
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

impl SpeechBackend for NullSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn cancel(&mut self) {}
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Speech capability wrapper
#[derive(Debug)]
pub struct SpeechAdapter<B> {
    backend: B,
    supported: bool,
    voice: VoiceOptions,
}

impl<B: SpeechBackend> SpeechAdapter<B> {
    /// Wrap a backend, probing support once
    pub fn new(backend: B, voice: VoiceOptions) -> Self {
        let supported = backend.is_supported();
        if !supported {
            tracing::warn!("speech synthesis unavailable");
        }
        Self { backend, supported, voice }
    }

    /// Cached capability probe
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn voice(&self) -> &VoiceOptions {
        &self.voice
    }

    /// Replace whatever is speaking with `text`.
    ///
    /// Returns `Ok(false)` when the text is empty after normalization; nothing
    /// is cancelled or spoken in that case.
    pub fn speak(&mut self, text: &str) -> Result<bool, SpeechError> {
        if !self.supported {
            return Err(SpeechError::Unsupported);
        }
        let text = normalize_text(text);
        if text.is_empty() {
            return Ok(false);
        }

        self.backend.cancel();
        tracing::debug!(text = %preview(&text), "speaking");
        self.backend.speak(&Utterance { text, voice: self.voice.clone() })?;
        Ok(true)
    }

    /// Stop speaking. Safe when nothing is speaking.
    pub fn cancel(&mut self) {
        if self.supported {
            self.backend.cancel();
        }
    }

    pub fn is_speaking(&mut self) -> bool {
        self.supported && self.backend.is_speaking()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(50) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend call, in order
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Speak(String),
        Cancel,
    }

    /// Records calls into a shared log
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSpeech {
        pub calls: Rc<RefCell<Vec<Call>>>,
        pub unsupported: bool,
        /// Every `speak` fails as if the synthesizer could not be started
        pub broken: bool,
    }

    impl RecordingSpeech {
        pub fn spoken(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Speak(t) => Some(t.clone()),
                    Call::Cancel => None,
                })
                .collect()
        }
    }

    impl SpeechBackend for RecordingSpeech {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
            if self.broken {
                return Err(SpeechError::Spawn(std::io::Error::other("no audio device")));
            }
            self.calls.borrow_mut().push(Call::Speak(utterance.text.clone()));
            Ok(())
        }

        fn cancel(&mut self) {
            self.calls.borrow_mut().push(Call::Cancel);
        }
    }
}
