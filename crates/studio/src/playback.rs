use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, StreamError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupt audio in {}: {details}", .path.display())]
    Decode { path: PathBuf, details: String },

    #[error("audio output unavailable: {details}")]
    AudioOutputUnavailable { details: String },
}

/// Plays finished audio files on the default output device.
///
/// The output stream is opened on first use and kept for the lifetime of the
/// player; dropping it would silence anything still playing. Only the UI
/// thread owns a player.
#[derive(Default)]
pub struct AudioPlayer {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn output_stream(&mut self) -> Result<&OutputStream, PlaybackError> {
        if self.stream.is_none() {
            tracing::debug!("opening default output stream");
            let stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
                PlaybackError::AudioOutputUnavailable {
                    details: format_stream_error(e),
                }
            })?;
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| PlaybackError::AudioOutputUnavailable {
                details: "internal error: output stream cache invariant violated".to_owned(),
            })
    }

    /// Stops whatever is playing and starts `path` from the beginning.
    pub fn play_file(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        self.stop();
        let sink = Sink::connect_new(self.output_stream()?.mixer());
        sink.append(source);
        tracing::info!(path = %path.display(), "playback started");
        self.sink = Some(sink);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            tracing::debug!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}

fn format_stream_error(err: StreamError) -> String {
    format!("open default output stream: {err}")
}
