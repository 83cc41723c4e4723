use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use voicecast_core::status::{StatusEvent, StatusReporter};
use voicecast_core::tts::SpeechClient;
use voicecast_core::{SynthesisJob, Synthesizer};

/// Forwards workflow progress to the UI thread. The worker never touches
/// widget state itself.
struct ChannelReporter {
    tx: Sender<StatusEvent>,
}

impl StatusReporter for ChannelReporter {
    fn report(&self, event: StatusEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("ui went away before the conversion finished");
        }
    }
}

/// Runs one conversion on a fresh thread. The thread always ends with either
/// a `Saved` or a `Failed` event on `tx`.
pub fn spawn_conversion<C>(
    synthesizer: Synthesizer<C>,
    job: SynthesisJob,
    tx: Sender<StatusEvent>,
) -> std::io::Result<JoinHandle<()>>
where
    C: SpeechClient + 'static,
{
    std::thread::Builder::new()
        .name("conversion".into())
        .spawn(move || {
            let reporter = ChannelReporter { tx };
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to start conversion runtime");
                    reporter.report(StatusEvent::Failed {
                        message: e.to_string(),
                    });
                    return;
                }
            };

            if let Err(e) = runtime.block_on(synthesizer.synthesize(job, &reporter)) {
                tracing::warn!(error = %e, "conversion failed");
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::mpsc;
    use voicecast_core::output::OutputDir;
    use voicecast_core::tts::{SpeechRequest, TtsError};

    struct FixedClient(Result<&'static [u8], &'static str>);

    impl SpeechClient for FixedClient {
        fn synthesize(&self, _request: SpeechRequest) -> BoxFuture<'_, Result<Bytes, TtsError>> {
            let result = self
                .0
                .map(Bytes::from_static)
                .map_err(|m| TtsError::Other(m.to_owned()));
            async move { result }.boxed()
        }
    }

    #[test]
    fn success_is_handed_back_over_the_channel() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let synth = Synthesizer::new(FixedClient(Ok(b"ID3")), OutputDir::new(tmp.path()));

        spawn_conversion(synth, SynthesisJob::new("hello", "nova"), tx)
            .unwrap()
            .join()
            .unwrap();

        let events: Vec<StatusEvent> = rx.try_iter().collect();
        assert!(matches!(events[0], StatusEvent::Started { .. }));
        match &events[1] {
            StatusEvent::Saved { path } => assert_eq!(std::fs::read(path).unwrap(), b"ID3"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn failure_is_handed_back_over_the_channel() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let synth = Synthesizer::new(
            FixedClient(Err("You exceeded your current quota")),
            OutputDir::new(tmp.path()),
        );

        spawn_conversion(synth, SynthesisJob::new("hello", "nova"), tx)
            .unwrap()
            .join()
            .unwrap();

        let last = rx.try_iter().last().unwrap();
        assert_eq!(
            last,
            StatusEvent::Failed {
                message: "You exceeded your current quota".into()
            }
        );
    }
}
