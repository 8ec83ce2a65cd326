//! Reading Controller
//!
//! Hover-to-speak state machine. While `Listening`, a single document-level
//! mouseover listener extracts readable text from the hovered element and
//! schedules it behind a short debounce; a newer hover replaces the pending
//! one. Every transition bumps a generation counter and each deferred
//! dispatch carries the generation it was scheduled under, so a dispatch
//! that outlives a transition is discarded instead of spoken.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use lumen_dom::{Document, DomEvent, DomEventType, EventListener, ListenerGuard, NodeId};

use crate::config::OverlayConfig;
use crate::extract::readable_text;
use crate::speech::{SpeechAdapter, SpeechBackend};
use crate::timers::{TimerId, TimerQueue};
use crate::A11yError;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingState {
    #[default]
    Idle,
    Listening,
}

/// Reading status as reported to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingStatus {
    Listening,
    Idle,
    /// Speech capability missing; the toggle should be disabled
    Unsupported,
}

/// Counters for observability and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingStats {
    /// Utterances handed to the speech adapter
    pub utterances: u64,
    /// Deferred dispatches dropped because the generation moved on
    pub stale_discarded: u64,
    /// Hovers over elements with nothing readable
    pub ignored_hovers: u64,
}

#[derive(Debug)]
struct DeferredSpeech {
    generation: u64,
    target: NodeId,
    text: String,
}

/// State shared between the controller and its hover listener
#[derive(Debug, Default)]
struct Shared {
    generation: Cell<u64>,
    timers: RefCell<TimerQueue<DeferredSpeech>>,
    pending: Cell<Option<TimerId>>,
    ignored_hovers: Cell<u64>,
}

/// The document-level mouseover listener
struct HoverReader {
    shared: Rc<Shared>,
    debounce: Duration,
    max_chars: usize,
}

impl EventListener for HoverReader {
    fn handle_event(&self, document: &Document, event: &DomEvent) {
        if event.event_type != DomEventType::MouseOver {
            return;
        }
        let Some(readable) = readable_text(document.tree(), event.target, self.max_chars) else {
            let ignored = &self.shared.ignored_hovers;
            ignored.set(ignored.get() + 1);
            tracing::trace!(node = ?event.target, "nothing readable under pointer");
            return;
        };

        let Ok(now) = Duration::try_from_secs_f64(event.timestamp.max(0.0) / 1000.0) else {
            tracing::debug!(timestamp = event.timestamp, "dropping hover with unusable timestamp");
            return;
        };
        let mut timers = self.shared.timers.borrow_mut();
        if let Some(previous) = self.shared.pending.take() {
            timers.clear(previous);
        }
        let deferred = DeferredSpeech {
            generation: self.shared.generation.get(),
            target: event.target,
            text: readable.text,
        };
        let id = timers.set_timeout(deferred, self.debounce, now);
        self.shared.pending.set(Some(id));
    }
}

/// Owns the hover listener and the current utterance
pub struct ReadingController<B: SpeechBackend> {
    speech: SpeechAdapter<B>,
    state: ReadingState,
    shared: Rc<Shared>,
    listener: Option<ListenerGuard>,
    debounce: Duration,
    max_chars: usize,
    announce_selectors: Vec<String>,
    utterances: u64,
    stale_discarded: u64,
}

impl<B: SpeechBackend> ReadingController<B> {
    pub fn new(speech: SpeechAdapter<B>, config: &OverlayConfig) -> Self {
        Self {
            speech,
            state: ReadingState::Idle,
            shared: Rc::new(Shared::default()),
            listener: None,
            debounce: config.debounce,
            max_chars: config.max_readable_chars,
            announce_selectors: config.announce_selectors.clone(),
            utterances: 0,
            stale_discarded: 0,
        }
    }

    pub fn state(&self) -> ReadingState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == ReadingState::Listening
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.get()
    }

    pub fn is_supported(&self) -> bool {
        self.speech.is_supported()
    }

    pub fn stats(&self) -> ReadingStats {
        ReadingStats {
            utterances: self.utterances,
            stale_discarded: self.stale_discarded,
            ignored_hovers: self.shared.ignored_hovers.get(),
        }
    }

    pub fn status(&self) -> ReadingStatus {
        match self.state {
            ReadingState::Listening => ReadingStatus::Listening,
            ReadingState::Idle if !self.is_supported() => ReadingStatus::Unsupported,
            ReadingState::Idle => ReadingStatus::Idle,
        }
    }

    pub fn speech(&self) -> &SpeechAdapter<B> {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut SpeechAdapter<B> {
        &mut self.speech
    }

    fn bump_generation(&self) {
        let generation = &self.shared.generation;
        generation.set(generation.get() + 1);
    }

    /// Begin listening for hovers on `document` and announce its heading.
    ///
    /// Fails with `SpeechUnsupported` without side effects when there is no
    /// speech capability. Calling it while already listening does nothing.
    pub fn start(&mut self, document: &Document) -> Result<(), A11yError> {
        if !self.speech.is_supported() {
            tracing::warn!("cannot start reading: speech synthesis unsupported");
            return Err(A11yError::SpeechUnsupported);
        }
        if self.state == ReadingState::Listening {
            return Ok(());
        }

        self.state = ReadingState::Listening;
        self.bump_generation();
        let reader = HoverReader {
            shared: Rc::clone(&self.shared),
            debounce: self.debounce,
            max_chars: self.max_chars,
        };
        self.listener = Some(document.add_event_listener(DomEventType::MouseOver, Rc::new(reader)));
        tracing::info!(generation = self.generation(), "reading started");

        if let Err(e) = self.announce(document) {
            tracing::warn!(error = %e, "activation announcement failed");
        }
        Ok(())
    }

    /// Speak the first element matching the announce selectors.
    /// Returns whether anything was spoken.
    pub fn announce(&mut self, document: &Document) -> Result<bool, A11yError> {
        let selectors: Vec<&str> = self.announce_selectors.iter().map(String::as_str).collect();
        let Some(heading) = document.query_first(&selectors) else {
            return Ok(false);
        };
        let spoken = self.speech.speak(&document.tree().text_content(heading))?;
        self.utterances += spoken as u64;
        Ok(spoken)
    }

    /// Stop listening and silence speech. Idempotent.
    pub fn stop(&mut self) {
        if self.state == ReadingState::Idle {
            return;
        }
        self.state = ReadingState::Idle;
        self.bump_generation();
        self.shared.pending.set(None);
        self.speech.cancel();
        self.listener = None;
        tracing::info!(generation = self.generation(), "reading stopped");
    }

    /// Start or stop to match the text-to-speech flag
    pub fn sync(&mut self, enabled: bool, document: &Document) -> ReadingStatus {
        if !enabled {
            self.stop();
        } else if self.is_supported() {
            if let Err(e) = self.start(document) {
                tracing::debug!(error = %e, "reading left idle");
            }
        }
        self.status()
    }

    /// Fire deferred dispatches due at `now`. Returns how many were spoken.
    pub fn poll(&mut self, now: Duration) -> usize {
        let ready = self.shared.timers.borrow_mut().drain_ready(now);
        let mut spoken = 0;
        for deferred in ready {
            if deferred.generation != self.generation() {
                self.stale_discarded += 1;
                tracing::debug!(
                    scheduled = deferred.generation,
                    current = self.generation(),
                    node = ?deferred.target,
                    "discarding stale dispatch"
                );
                continue;
            }
            spoken += self.dispatch(&deferred.text) as usize;
        }
        spoken
    }

    /// Time until the next deferred dispatch is due
    pub fn next_deadline(&self, now: Duration) -> Option<Duration> {
        self.shared.timers.borrow().time_until_next(now)
    }

    fn dispatch(&mut self, text: &str) -> bool {
        match self.speech.speak(text) {
            Ok(spoken) => {
                self.utterances += spoken as u64;
                spoken
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech dispatch failed");
                false
            }
        }
    }
}

impl<B: SpeechBackend> Drop for ReadingController<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<B: SpeechBackend> std::fmt::Debug for ReadingController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingController")
            .field("state", &self.state)
            .field("generation", &self.generation())
            .field("listening", &self.listener.is_some())
            .finish()
    }
}
