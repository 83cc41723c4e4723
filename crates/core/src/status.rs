use crate::output::LanguageHint;
use crate::tts::Voice;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    Started {
        voice: Voice,
        language: Option<LanguageHint>,
        path: PathBuf,
    },
    Saved {
        path: PathBuf,
    },
    Failed {
        message: String,
    },
}

pub trait StatusReporter: Send + Sync {
    fn report(&self, event: StatusEvent);
}

/// Prints progress lines to a writer, stdout by default.
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub fn console_lines(event: &StatusEvent) -> Vec<String> {
    match event {
        StatusEvent::Started { voice, language, .. } => {
            let mut lines = vec![format!("Converting text to speech using voice: {voice}")];
            if let Some(lang) = language {
                lines.push(format!("Processing in language: {}", lang.as_str()));
            }
            lines
        }
        StatusEvent::Saved { path } => vec![format!("Audio saved to: {}", path.display())],
        StatusEvent::Failed { message } => {
            vec![format!("Error during text-to-speech conversion: {message}")]
        }
    }
}

impl<W: Write + Send> StatusReporter for ConsoleReporter<W> {
    fn report(&self, event: StatusEvent) {
        let mut out = match self.out.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        for line in console_lines(&event) {
            if let Err(e) = writeln!(out, "{line}") {
                tracing::warn!(error = %e, "failed to write status line");
                return;
            }
        }
    }
}
