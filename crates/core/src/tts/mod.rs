mod openai;

use bytes::Bytes;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use openai::OpenAiSpeechClient;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }

    /// Comma separated list of every accepted voice name.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(Voice::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid voice '{given}'; choose from: {}", Voice::allowed_list())]
pub struct InvalidVoice {
    pub given: String,
}

impl FromStr for Voice {
    type Err = InvalidVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| InvalidVoice {
                given: s.to_owned(),
            })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Model(pub String);

impl Model {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Self(crate::config::DEFAULT_MODEL.to_owned())
    }
}

/// Container the service should encode the audio in.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
}

/// Body of `POST /audio/speech`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechRequest {
    pub model: Model,
    pub voice: Voice,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(thiserror::Error, Debug)]
pub enum TtsError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

pub trait SpeechClient: Send + Sync {
    fn synthesize(&self, request: SpeechRequest) -> BoxFuture<'_, Result<Bytes, TtsError>>;
}
