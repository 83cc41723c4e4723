use crate::config::OUTPUT_DIR;
use crate::tts::Voice;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const AUDIO_EXTENSION: &str = "mp3";

/// Optional language code. Only used for naming and status text; the
/// request body never carries it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageHint(String);

impl LanguageHint {
    /// Blank input means "no hint".
    pub fn parse<S: AsRef<str>>(value: S) -> Option<Self> {
        let v = value.as_ref().trim();
        (!v.is_empty()).then(|| Self(v.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable name from [`LANGUAGES`], if the code is listed there.
    pub fn display_name(&self) -> Option<&'static str> {
        LANGUAGES
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
    }
}

/// Selector entries offered by the studio. The empty code means auto-detect.
pub const LANGUAGES: [(&str, &str); 10] = [
    ("Auto-detect", ""),
    ("Vietnamese", "vi"),
    ("English", "en"),
    ("French", "fr"),
    ("German", "de"),
    ("Spanish", "es"),
    ("Chinese", "zh"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Thai", "th"),
];

/// Managed directory that receives generated files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputDir(PathBuf);

impl OutputDir {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Creates the directory (and parents) when missing.
    pub fn ensure(&self) -> std::io::Result<&Self> {
        std::fs::create_dir_all(&self.0)?;
        Ok(self)
    }
}

impl Default for OutputDir {
    fn default() -> Self {
        Self(PathBuf::from(OUTPUT_DIR))
    }
}

/// `speech_{voice}[_{lang}]_{YYYYMMDD_HHMMSS}.mp3`
pub fn default_file_name(
    voice: Voice,
    language: Option<&LanguageHint>,
    now: NaiveDateTime,
) -> String {
    let lang_suffix = language
        .map(|l| format!("_{}", l.as_str()))
        .unwrap_or_default();
    format!(
        "speech_{voice}{lang_suffix}_{}.{AUDIO_EXTENSION}",
        now.format(TIMESTAMP_FORMAT)
    )
}

/// An explicit path is used as given. Otherwise a timestamped name inside the
/// managed directory; two calls within the same second collide and the last
/// write wins.
pub fn resolve_output_path(
    explicit: Option<&Path>,
    dir: &OutputDir,
    voice: Voice,
    language: Option<&LanguageHint>,
    now: NaiveDateTime,
) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => dir.path().join(default_file_name(voice, language, now)),
    }
}
