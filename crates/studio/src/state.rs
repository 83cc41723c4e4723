use std::path::{Path, PathBuf};
use voicecast_core::config::{
    resolve_api_key, ApiKey, Env, DEFAULT_MODEL, ENV_OPENAI_API_KEY, HD_MODEL,
};
use voicecast_core::input::load_text_file;
use voicecast_core::output::{LanguageHint, LANGUAGES};
use voicecast_core::status::StatusEvent;
use voicecast_core::text::normalize_nfc;
use voicecast_core::tts::{Model, ResponseFormat, Voice};
use voicecast_core::SynthesisJob;

pub const MODELS: [&str; 2] = [DEFAULT_MODEL, HD_MODEL];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    ApiKey,
    Text,
    LoadPath,
    Voice,
    Model,
    Language,
    Output,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::ApiKey,
        Focus::Text,
        Focus::LoadPath,
        Focus::Voice,
        Focus::Model,
        Focus::Language,
        Focus::Output,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: &'static str,
    pub message: String,
}

impl Dialog {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: "Success",
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Warning,
            title: "Warning",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

/// A validated conversion ready to hand to a worker.
#[derive(Debug)]
pub struct ConversionRequest {
    pub api_key: ApiKey,
    pub job: SynthesisJob,
}

/// Everything the window shows, owned by the UI thread. The text body lives
/// in the text area widget and is passed in where needed.
pub struct StudioState {
    pub api_key: String,
    pub show_key: bool,
    pub voice_idx: usize,
    pub model_idx: usize,
    pub language_idx: usize,
    pub output_path: String,
    pub load_path: String,
    pub normalize: bool,

    pub status: String,
    pub convert_enabled: bool,
    pub play_enabled: bool,
    pub stop_enabled: bool,
    pub dialog: Option<Dialog>,
    pub current_audio: Option<PathBuf>,

    pub focus: Focus,
    pub should_quit: bool,
}

impl StudioState {
    pub fn new(initial_api_key: Option<String>) -> Self {
        Self {
            api_key: initial_api_key.unwrap_or_default(),
            show_key: false,
            voice_idx: Voice::ALL
                .iter()
                .position(|v| *v == Voice::Nova)
                .unwrap_or(0),
            model_idx: 0,
            language_idx: 0,
            output_path: String::new(),
            load_path: String::new(),
            normalize: true,
            status: "Ready".to_owned(),
            convert_enabled: true,
            play_enabled: false,
            stop_enabled: false,
            dialog: None,
            current_audio: None,
            focus: Focus::Text,
            should_quit: false,
        }
    }

    pub fn voice(&self) -> Voice {
        Voice::ALL[self.voice_idx % Voice::ALL.len()]
    }

    pub fn model(&self) -> &'static str {
        MODELS[self.model_idx % MODELS.len()]
    }

    pub fn language_name(&self) -> &'static str {
        LANGUAGES[self.language_idx % LANGUAGES.len()].0
    }

    pub fn language(&self) -> Option<LanguageHint> {
        LanguageHint::parse(LANGUAGES[self.language_idx % LANGUAGES.len()].1)
    }

    /// Moves the focused selector one step; `forward == false` goes back.
    pub fn cycle_selection(&mut self, forward: bool) {
        let (idx, len) = match self.focus {
            Focus::Voice => (&mut self.voice_idx, Voice::ALL.len()),
            Focus::Model => (&mut self.model_idx, MODELS.len()),
            Focus::Language => (&mut self.language_idx, LANGUAGES.len()),
            _ => return,
        };
        *idx = if forward {
            (*idx + 1) % len
        } else {
            (*idx + len - 1) % len
        };
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn toggle_key_visibility(&mut self) {
        self.show_key = !self.show_key;
    }

    pub fn toggle_normalize(&mut self) {
        self.normalize = !self.normalize;
    }

    pub fn text_cleared(&mut self) {
        self.status = "Text cleared".to_owned();
    }

    /// Validates the form and, when it is complete, disables convert and
    /// returns the work to run. An empty credential field falls back to the
    /// environment.
    pub fn begin_conversion(&mut self, text: &str, env: &impl Env) -> Option<ConversionRequest> {
        if !self.convert_enabled {
            return None;
        }

        let text = text.trim();
        if text.is_empty() {
            self.dialog = Some(Dialog::warning("Please enter some text to convert"));
            return None;
        }

        let api_key = match resolve_api_key(Some(self.api_key.clone()), ENV_OPENAI_API_KEY, env) {
            Ok(Some(key)) => key,
            Ok(None) | Err(_) => {
                self.dialog = Some(Dialog::warning("Please enter your OpenAI API key"));
                return None;
            }
        };

        let output = self.output_path.trim();
        let job = SynthesisJob {
            text: text.to_owned(),
            voice: self.voice().as_str().to_owned(),
            model: Model::new(self.model()),
            language: self.language(),
            output: (!output.is_empty()).then(|| PathBuf::from(output)),
            normalize: self.normalize,
            response_format: Some(ResponseFormat::Mp3),
        };

        self.convert_enabled = false;
        self.status = "Converting text to speech...".to_owned();
        Some(ConversionRequest { api_key, job })
    }

    /// Applies a progress message from the worker.
    pub fn apply(&mut self, event: StatusEvent) {
        match event {
            StatusEvent::Started { language, path, .. } => {
                if self.output_path.trim().is_empty() {
                    self.output_path = path.display().to_string();
                }
                if let Some(lang) = language {
                    let name = lang.display_name().unwrap_or("Unknown");
                    self.status = format!("Converting text in {name}...");
                }
            }
            StatusEvent::Saved { path } => {
                self.status = format!("Audio saved to: {}", path.display());
                self.dialog = Some(Dialog::info(format!(
                    "Text converted to speech successfully!\nSaved to: {}",
                    path.display()
                )));
                self.current_audio = Some(path);
                self.convert_enabled = true;
                self.play_enabled = true;
                self.stop_enabled = true;
            }
            StatusEvent::Failed { message } => {
                self.dialog = Some(Dialog::error(format!("Conversion failed: {message}")));
                self.status = "Conversion failed".to_owned();
                self.convert_enabled = true;
            }
        }
    }

    /// Reads the file named in the load field. Returns the text for the text
    /// area on success.
    pub fn load_file(&mut self) -> Option<String> {
        let raw = self.load_path.trim().to_owned();
        if raw.is_empty() {
            self.dialog = Some(Dialog::warning("Type the path of a text file to load"));
            return None;
        }

        let path = Path::new(&raw);
        match load_text_file(path) {
            Ok(loaded) => {
                let text = if self.normalize {
                    normalize_nfc(&loaded.text)
                } else {
                    loaded.text
                };
                self.status = format!("Loaded text from: {}", path.display());
                Some(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "text file load failed");
                self.dialog = Some(Dialog::error(format!("Failed to load file: {e}")));
                None
            }
        }
    }

    /// The last generated file, if it is still on disk.
    pub fn audio_to_play(&mut self) -> Option<PathBuf> {
        match &self.current_audio {
            Some(path) if path.exists() => Some(path.clone()),
            _ => {
                self.dialog = Some(Dialog::warning(
                    "No audio file available. Convert text to speech first.",
                ));
                None
            }
        }
    }

    pub fn playing(&mut self, path: &Path) {
        self.status = format!("Playing: {}", path.display());
    }

    pub fn playback_failed(&mut self, message: impl std::fmt::Display) {
        self.dialog = Some(Dialog::error(format!("Failed to play audio: {message}")));
    }

    pub fn stopped(&mut self) {
        self.status = "Audio playback stopped".to_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use voicecast_core::config::MapEnv;

    fn state_with_key() -> StudioState {
        StudioState::new(Some("sk-field".into()))
    }

    #[test]
    fn starts_ready_with_only_convert_enabled() {
        let s = StudioState::new(None);
        assert_eq!(s.status, "Ready");
        assert!(s.convert_enabled);
        assert!(!s.play_enabled && !s.stop_enabled);
        assert_eq!(s.voice(), Voice::Nova);
        assert_eq!(s.model(), "tts-1");
        assert_eq!(s.language(), None);
        assert!(s.normalize);
    }

    #[test]
    fn empty_text_shows_warning_and_keeps_convert_enabled() {
        let mut s = state_with_key();
        assert!(s.begin_conversion("  \n ", &MapEnv::default()).is_none());
        assert_eq!(s.dialog.as_ref().unwrap().kind, DialogKind::Warning);
        assert!(s.convert_enabled);
    }

    #[test]
    fn missing_credential_shows_warning() {
        let mut s = StudioState::new(None);
        assert!(s.begin_conversion("hello", &MapEnv::default()).is_none());
        assert_eq!(
            s.dialog.as_ref().unwrap().message,
            "Please enter your OpenAI API key"
        );
        assert!(s.convert_enabled);
    }

    #[test]
    fn field_key_wins_over_environment() {
        let env = MapEnv::default().with_var(ENV_OPENAI_API_KEY, "sk-env");
        let mut s = state_with_key();
        let req = s.begin_conversion("hello", &env).unwrap();
        assert_eq!(req.api_key.expose(), "sk-field");

        let mut s = StudioState::new(None);
        let req = s.begin_conversion("hello", &env).unwrap();
        assert_eq!(req.api_key.expose(), "sk-env");
    }

    #[test]
    fn begin_conversion_disables_convert_and_builds_job() {
        let mut s = state_with_key();
        s.focus = Focus::Language;
        s.cycle_selection(true);
        s.focus = Focus::Model;
        s.cycle_selection(true);
        s.normalize = false;

        let req = s.begin_conversion("  xin chào \n", &MapEnv::default()).unwrap();
        assert!(!s.convert_enabled);
        assert_eq!(s.status, "Converting text to speech...");
        assert_eq!(req.job.text, "xin chào");
        assert_eq!(req.job.voice, "nova");
        assert_eq!(req.job.model.as_str(), "tts-1-hd");
        assert_eq!(req.job.language.as_ref().map(LanguageHint::as_str), Some("vi"));
        assert_eq!(req.job.output, None);
        assert!(!req.job.normalize);
        assert_eq!(req.job.response_format, Some(ResponseFormat::Mp3));

        // A second click while in flight does nothing.
        assert!(s.begin_conversion("again", &MapEnv::default()).is_none());
    }

    #[test]
    fn started_fills_empty_output_and_names_language() {
        let mut s = state_with_key();
        s.apply(StatusEvent::Started {
            voice: Voice::Nova,
            language: LanguageHint::parse("vi"),
            path: PathBuf::from("tts_output/speech_nova_vi_20240101_000000.mp3"),
        });
        assert_eq!(s.output_path, "tts_output/speech_nova_vi_20240101_000000.mp3");
        assert_eq!(s.status, "Converting text in Vietnamese...");
    }

    #[test]
    fn started_keeps_user_output_path() {
        let mut s = state_with_key();
        s.output_path = "mine.mp3".into();
        s.apply(StatusEvent::Started {
            voice: Voice::Nova,
            language: None,
            path: PathBuf::from("mine.mp3"),
        });
        assert_eq!(s.output_path, "mine.mp3");
    }

    #[test]
    fn success_enables_playback_controls() {
        let mut s = state_with_key();
        s.begin_conversion("hello", &MapEnv::default()).unwrap();
        s.apply(StatusEvent::Saved {
            path: PathBuf::from("out.mp3"),
        });
        assert!(s.convert_enabled && s.play_enabled && s.stop_enabled);
        assert_eq!(s.status, "Audio saved to: out.mp3");
        assert_eq!(s.current_audio, Some(PathBuf::from("out.mp3")));
        assert_eq!(s.dialog.as_ref().unwrap().kind, DialogKind::Info);
    }

    #[test]
    fn failure_re_enables_convert_only() {
        let mut s = state_with_key();
        s.begin_conversion("hello", &MapEnv::default()).unwrap();
        s.apply(StatusEvent::Failed {
            message: "Rate limit reached".into(),
        });
        assert!(s.convert_enabled);
        assert!(!s.play_enabled && !s.stop_enabled);
        assert_eq!(s.status, "Conversion failed");
        assert_eq!(
            s.dialog.as_ref().unwrap().message,
            "Conversion failed: Rate limit reached"
        );
    }

    #[test]
    fn selectors_wrap_in_both_directions() {
        let mut s = state_with_key();
        s.focus = Focus::Voice;
        for _ in 0..Voice::ALL.len() {
            s.cycle_selection(true);
        }
        assert_eq!(s.voice(), Voice::Nova);
        s.focus = Focus::Language;
        s.cycle_selection(false);
        assert_eq!(s.language_name(), "Thai");
    }

    #[test]
    fn focus_cycles_through_every_field() {
        let mut f = Focus::ApiKey;
        for _ in 0..7 {
            f = f.next();
        }
        assert_eq!(f, Focus::ApiKey);
        assert_eq!(Focus::ApiKey.prev(), Focus::Output);
    }

    #[test]
    fn load_file_normalizes_when_enabled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("cha\u{0300}o".as_bytes()).unwrap();

        let mut s = state_with_key();
        s.load_path = file.path().display().to_string();
        assert_eq!(s.load_file().unwrap(), "ch\u{00e0}o");
        assert!(s.status.starts_with("Loaded text from: "));

        s.normalize = false;
        assert_eq!(s.load_file().unwrap(), "cha\u{0300}o");
    }

    #[test]
    fn load_failure_opens_error_dialog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x81\x8d\x8f\x90\x9d").unwrap();

        let mut s = state_with_key();
        s.load_path = file.path().display().to_string();
        assert!(s.load_file().is_none());
        let dialog = s.dialog.unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert!(dialog.message.starts_with("Failed to load file: "));
    }

    #[test]
    fn play_without_audio_warns() {
        let mut s = state_with_key();
        assert!(s.audio_to_play().is_none());
        assert_eq!(s.dialog.unwrap().kind, DialogKind::Warning);
    }
}
