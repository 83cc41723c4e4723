use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_VOICE: &str = "nova";
pub const DEFAULT_MODEL: &str = "tts-1";
pub const HD_MODEL: &str = "tts-1-hd";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const OUTPUT_DIR: &str = "tts_output";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

/// Everything a shell needs before it can issue a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub output_dir: PathBuf,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "OpenAI API key is required. Set {ENV_OPENAI_API_KEY} environment variable or provide it as an argument."
    )]
    MissingApiKey,
    #[error("api key must not be empty")]
    EmptyApiKey,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Flag value wins over the environment. Blank values on either side count
/// as absent so an empty GUI field falls through to `OPENAI_API_KEY`.
pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    let candidate = cli_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env.var(env_key).filter(|v| !v.trim().is_empty()));
    candidate.map(ApiKey::new).transpose()
}

pub fn require_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<ApiKey, ConfigError> {
    resolve_api_key(cli_value, env_key, env)?.ok_or(ConfigError::MissingApiKey)
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}
