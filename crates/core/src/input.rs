//! Where the text to synthesize comes from.
//!
//! The command line reads files as strict UTF-8. The studio loader walks a
//! short list of encodings common for Vietnamese text and keeps the first one
//! that decodes cleanly.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1258};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const PROMPT: &str = "Enter the text to convert to speech: ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextSource {
    Literal(String),
    File(PathBuf),
    Prompt,
}

impl TextSource {
    /// Literal text beats a file, a file beats the prompt.
    pub fn pick(text: Option<String>, file: Option<PathBuf>) -> Self {
        match (text, file) {
            (Some(t), _) => TextSource::Literal(t),
            (None, Some(f)) => TextSource::File(f),
            (None, None) => TextSource::Prompt,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("Error reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {} is not valid UTF-8", .path.display())]
    NotUtf8 { path: PathBuf },

    #[error("none of the supported encodings ({}) could decode {}", FALLBACK_ENCODINGS.join(", "), .path.display())]
    Undecodable { path: PathBuf },

    #[error("failed to read text from stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

const FALLBACK_ENCODINGS: [&str; 3] = ["utf-8", "utf-16", "windows-1258"];

/// Decoded file contents and the encoding that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

pub fn read_utf8_file(path: &Path) -> Result<String, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_utf8(&bytes).ok_or_else(|| InputError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

pub fn load_text_file(path: &Path) -> Result<LoadedText, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = decode_with_fallbacks(&bytes).ok_or_else(|| InputError::Undecodable {
        path: path.to_path_buf(),
    })?;
    tracing::debug!(
        path = %path.display(),
        encoding = loaded.encoding.name(),
        "loaded text file"
    );
    Ok(loaded)
}

pub fn decode_with_fallbacks(bytes: &[u8]) -> Option<LoadedText> {
    if let Some(text) = decode_utf8(bytes) {
        return Some(LoadedText {
            text,
            encoding: UTF_8,
        });
    }
    if let Some((text, encoding)) = decode_utf16_with_bom(bytes) {
        return Some(LoadedText { text, encoding });
    }
    decode_windows_1258(bytes).map(|text| LoadedText {
        text,
        encoding: WINDOWS_1258,
    })
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

// Without a byte order mark almost any even-length byte string "decodes" as
// UTF-16, which would shadow the code page fallback.
fn decode_utf16_with_bom(bytes: &[u8]) -> Option<(String, &'static Encoding)> {
    let (encoding, bom_len) = Encoding::for_bom(bytes)?;
    if encoding != UTF_16LE && encoding != UTF_16BE {
        return None;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| (text.into_owned(), encoding))
}

// encoding_rs maps the bytes Windows-1258 leaves undefined onto the C1
// control range; treat those as a failed decode.
fn decode_windows_1258(bytes: &[u8]) -> Option<String> {
    let text = WINDOWS_1258.decode_without_bom_handling_and_without_replacement(bytes)?;
    if text.chars().any(|c| ('\u{80}'..='\u{9f}').contains(&c)) {
        return None;
    }
    Some(text.into_owned())
}

/// Reads one line after printing [`PROMPT`], or everything when the input is
/// piped.
pub fn read_prompt(
    mut input: impl BufRead,
    mut out: impl Write,
    interactive: bool,
) -> Result<String, InputError> {
    if !interactive {
        let mut text = String::new();
        input.read_to_string(&mut text).map_err(InputError::Stdin)?;
        return Ok(text);
    }

    write!(out, "{PROMPT}").map_err(InputError::Stdin)?;
    out.flush().map_err(InputError::Stdin)?;
    let mut line = String::new();
    input.read_line(&mut line).map_err(InputError::Stdin)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

pub fn collect_text(
    source: TextSource,
    input: impl BufRead,
    out: impl Write,
    interactive: bool,
) -> Result<String, InputError> {
    match source {
        TextSource::Literal(text) => Ok(text),
        TextSource::File(path) => read_utf8_file(&path),
        TextSource::Prompt => read_prompt(input, out, interactive),
    }
}
