//! espeak-ng backend
//!
//! Speaks by spawning `espeak-ng` (or `espeak`) straight to the audio device.
//! At most one child process is alive; cancelling kills and reaps it.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use super::{SpeechBackend, SpeechError, Utterance};

/// Process backend configuration
#[derive(Debug, Clone, Default)]
pub struct EspeakConfig {
    /// Synthesizer binary; `None` means speech is unsupported
    pub binary: Option<PathBuf>,
}

impl EspeakConfig {
    /// `ESPEAK_BIN`, then `espeak-ng` / `espeak` on `PATH`
    pub fn discover() -> Self {
        let binary = std::env::var_os("ESPEAK_BIN")
            .map(PathBuf::from)
            .filter(|p| p.is_file())
            .or_else(|| find_in_path("espeak-ng"))
            .or_else(|| find_in_path("espeak"));
        Self { binary }
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Speech through an espeak-ng child process
#[derive(Debug)]
pub struct EspeakSpeech {
    config: EspeakConfig,
    child: Option<Child>,
}

impl EspeakSpeech {
    pub fn new(config: EspeakConfig) -> Self {
        Self { config, child: None }
    }

    pub fn binary(&self) -> Option<&Path> {
        self.config.binary.as_deref()
    }

    fn command(binary: &Path, utterance: &Utterance) -> Command {
        let voice = &utterance.voice;
        let wpm = (175.0 * voice.rate).round().clamp(80.0, 450.0) as i32;
        let pitch = (50.0 * voice.pitch).round().clamp(0.0, 99.0) as i32;
        let amplitude = (100.0 * voice.volume).round().clamp(0.0, 200.0) as i32;

        let mut cmd = Command::new(binary);
        cmd.arg("-v").arg(voice.language.to_ascii_lowercase());
        cmd.arg("-s").arg(wpm.to_string());
        cmd.arg("-p").arg(pitch.to_string());
        cmd.arg("-a").arg(amplitude.to_string());
        cmd.arg("--").arg(&utterance.text);
        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        cmd
    }
}

impl SpeechBackend for EspeakSpeech {
    fn is_supported(&self) -> bool {
        self.config.binary.is_some()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let binary = self.config.binary.clone().ok_or(SpeechError::Unsupported)?;
        self.cancel();
        let mut cmd = Self::command(&binary, utterance);
        tracing::trace!(command = ?cmd, "spawning synthesizer");
        self.child = Some(cmd.spawn()?);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_speaking(&mut self) -> bool {
        match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.child = None;
                false
            }
            None => false,
        }
    }
}

impl Drop for EspeakSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}
