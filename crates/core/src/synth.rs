use crate::config::ConfigError;
use crate::input::InputError;
use crate::output::{resolve_output_path, LanguageHint, OutputDir};
use crate::status::{StatusEvent, StatusReporter};
use crate::text::normalize_nfc;
use crate::tts::{InvalidVoice, Model, ResponseFormat, SpeechClient, SpeechRequest, Voice};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const LOG_TARGET: &str = "synth";

/// One conversion as collected by a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisJob {
    pub text: String,
    /// Raw voice name; validated before anything else happens.
    pub voice: String,
    pub model: Model,
    pub language: Option<LanguageHint>,
    pub output: Option<PathBuf>,
    pub normalize: bool,
    pub response_format: Option<ResponseFormat>,
}

impl SynthesisJob {
    pub fn new<T: Into<String>, V: Into<String>>(text: T, voice: V) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            model: Model::default(),
            language: None,
            output: None,
            normalize: true,
            response_format: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidVoice(#[from] InvalidVoice),

    #[error("no text to convert")]
    EmptyText,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{message}")]
    Remote { message: String },

    #[error("failed to write audio to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to prepare output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SynthesisError {
    /// 1 bad input or configuration, 2 local file trouble, 3 remote failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            SynthesisError::Config(_)
            | SynthesisError::InvalidVoice(_)
            | SynthesisError::EmptyText => 1,
            SynthesisError::Input(InputError::Stdin(_)) => 1,
            SynthesisError::Input(_)
            | SynthesisError::Write { .. }
            | SynthesisError::OutputDir { .. } => 2,
            SynthesisError::Remote { .. } => 3,
        }
    }
}

pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub struct Synthesizer<C> {
    client: C,
    output_dir: OutputDir,
    clock: Clock,
}

impl<C: SpeechClient> Synthesizer<C> {
    pub fn new(client: C, output_dir: OutputDir) -> Self {
        Self {
            client,
            output_dir,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Path a job would be written to, without contacting the service.
    pub fn planned_path(&self, voice: Voice, job: &SynthesisJob) -> PathBuf {
        resolve_output_path(
            job.output.as_deref(),
            &self.output_dir,
            voice,
            job.language.as_ref(),
            (self.clock)(),
        )
    }

    pub async fn synthesize(
        &self,
        job: SynthesisJob,
        reporter: &dyn StatusReporter,
    ) -> Result<PathBuf, SynthesisError> {
        let result = self.run(job, reporter).await;
        match &result {
            Ok(path) => reporter.report(StatusEvent::Saved { path: path.clone() }),
            Err(e) => reporter.report(StatusEvent::Failed {
                message: e.to_string(),
            }),
        }
        result
    }

    async fn run(
        &self,
        job: SynthesisJob,
        reporter: &dyn StatusReporter,
    ) -> Result<PathBuf, SynthesisError> {
        let voice: Voice = job.voice.parse()?;

        if job.text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let input = if job.normalize {
            normalize_nfc(&job.text)
        } else {
            job.text.clone()
        };

        let path = self.planned_path(voice, &job);

        reporter.report(StatusEvent::Started {
            voice,
            language: job.language.clone(),
            path: path.clone(),
        });

        let request = SpeechRequest {
            model: job.model,
            voice,
            input,
            response_format: job.response_format,
        };

        tracing::info!(
            target: LOG_TARGET,
            voice = %voice,
            model = %request.model.as_str(),
            language = job.language.as_ref().map(LanguageHint::as_str).unwrap_or("auto"),
            path = %path.display(),
            "requesting speech"
        );

        let audio = self
            .client
            .synthesize(request)
            .await
            .map_err(|e| SynthesisError::Remote {
                message: e.to_string(),
            })?;

        write_audio(&path, &audio).await?;

        tracing::info!(target: LOG_TARGET, bytes = audio.len(), path = %path.display(), "audio saved");
        Ok(path)
    }
}

/// Creates or truncates `path` and writes the audio. A file this call created
/// is removed again if the write itself fails; an open failure leaves
/// whatever was there untouched.
async fn write_audio(path: &Path, audio: &[u8]) -> Result<(), SynthesisError> {
    let to_write_error = |source: std::io::Error| SynthesisError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(to_write_error)?;
    let written = match file.write_all(audio).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(source) = written {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!(target: LOG_TARGET, error = %e, "failed to remove partial audio file");
        }
        return Err(to_write_error(source));
    }
    Ok(())
}
