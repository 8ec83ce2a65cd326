//! Lumen Shell - Main Entry Point
//!
//! Usage: lumen-shell [--storage PATH] [--mute] [COMMAND...]
//!
//! Commands:
//!   contrast            toggle high contrast
//!   mode <name>         none | protanopia | deuteranopia | tritanopia | achromatopsia
//!   font <n> | font+ | font- | font-reset
//!   speech              toggle hover-to-speak
//!   hover <index>       hover the n-th demo element
//!   status              print settings and projection

mod demo;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use lumen_a11y::applier::{COLOR_BLIND_ATTRIBUTE, FONT_SIZE_PROPERTY, HIGH_CONTRAST_CLASS};
use lumen_a11y::{
    AccessibilityOverlay, ColorBlindMode, ColorFilter, EspeakConfig, EspeakSpeech, LocalStorage,
    NullSpeech, OverlayConfig, SpeechBackend,
};
use lumen_dom::{Document, DomEvent, NodeId};
use tracing_subscriber::EnvFilter;

type Overlay = AccessibilityOverlay<LocalStorage, Box<dyn SpeechBackend>>;

/// Longest we wait for an utterance to finish before exiting
const SPEECH_WAIT_LIMIT: Duration = Duration::from_secs(10);

struct Shell {
    doc: Document,
    targets: Vec<NodeId>,
    overlay: Overlay,
    started: Instant,
}

impl Shell {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn run(&mut self, command: &str, args: &mut impl Iterator<Item = String>) -> anyhow::Result<()> {
        let doc = &mut self.doc;
        match command {
            "contrast" => self.overlay.toggle_high_contrast(doc),
            "mode" => {
                let name = args.next().context("mode needs a name")?;
                let mode: ColorBlindMode = name.parse()?;
                self.overlay.set_color_blind_mode(doc, mode);
            }
            "font" => {
                let size = args.next().context("font needs a size")?;
                let size: i64 = size.parse().with_context(|| format!("invalid font size {size:?}"))?;
                self.overlay.set_font_size(doc, size);
            }
            "font+" => self.overlay.increase_font_size(doc),
            "font-" => self.overlay.decrease_font_size(doc),
            "font-reset" => self.overlay.reset_font_size(doc),
            "speech" => {
                let status = self.overlay.toggle_text_to_speech(doc);
                println!("reading: {status:?}");
                self.settle();
            }
            "hover" => {
                let index: usize = args.next().context("hover needs an index")?.parse()?;
                let target = *self.targets.get(index).with_context(|| format!("no demo element {index}"))?;
                let event = DomEvent::mouse_over(target, self.now().as_secs_f64() * 1000.0);
                self.overlay.handle_event(&self.doc, &event);
                self.settle();
            }
            "status" => self.print_status(),
            other => bail!("unknown command {other:?}"),
        }
        Ok(())
    }

    /// Fire pending dispatches and let speech finish
    fn settle(&mut self) {
        while let Some(wait) = self.overlay.reader().next_deadline(self.now()) {
            thread::sleep(wait);
            self.overlay.poll(self.now());
        }
        let deadline = Instant::now() + SPEECH_WAIT_LIMIT;
        while self.overlay.reader_mut().speech_mut().is_speaking() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
    }

    fn print_status(&self) {
        let settings = self.overlay.settings();
        let root = self.doc.document_element();
        let tree = self.doc.tree();
        println!("settings:      {settings:?}");
        println!("reading:       {:?}", self.overlay.reading_status());
        println!("contrast:      {}", tree.has_class(root, HIGH_CONTRAST_CLASS));
        println!("mode attr:     {:?}", tree.get_attribute(root, COLOR_BLIND_ATTRIBUTE));
        println!("font var:      {:?}", tree.style_property(root, FONT_SIZE_PROPERTY));
        println!("filter:        {}", ColorFilter::for_mode(settings.color_blind_mode).fe_color_matrix());
        for (i, target) in self.targets.iter().enumerate() {
            let tag = tree.tag_name(*target).unwrap_or("?");
            println!("  [{i}] <{tag}> {}", tree.text_content(*target));
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1).peekable();
    let mut storage_path = PathBuf::from("lumen-settings.json");
    let mut mute = false;
    while let Some(flag) = args.peek().filter(|a| a.starts_with("--")).cloned() {
        args.next();
        match flag.as_str() {
            "--storage" => storage_path = args.next().context("--storage needs a path")?.into(),
            "--mute" => mute = true,
            other => bail!("unknown flag {other:?}"),
        }
    }

    let speech: Box<dyn SpeechBackend> = if mute {
        Box::new(NullSpeech)
    } else {
        Box::new(EspeakSpeech::new(EspeakConfig::discover()))
    };

    let (mut doc, targets) = demo::dashboard()?;
    let storage = LocalStorage::open(&storage_path);
    tracing::info!(storage = %storage_path.display(), "starting Lumen shell");
    let overlay = AccessibilityOverlay::attach(&mut doc, storage, speech, OverlayConfig::default());
    if !overlay.speech_supported() {
        println!("note: speech synthesis unavailable, hover-to-speak is disabled");
    }

    let mut shell = Shell { doc, targets, overlay, started: Instant::now() };
    shell.settle();
    while let Some(command) = args.next() {
        shell.run(&command, &mut args)?;
    }

    shell.overlay.detach();
    Ok(())
}
