use crate::config::{ApiKey, DEFAULT_BASE_URL};
use crate::tts::{SpeechClient, SpeechRequest, TtsError};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Deserialize;

const LOG_TARGET: &str = "tts::openai";

#[derive(Clone)]
pub struct OpenAiSpeechClient {
    client: Client,
    api_key: ApiKey,
    base_url: String,
}

impl OpenAiSpeechClient {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// The service wraps failures as `{"error": {"message": ...}}`; anything else
/// is surfaced as the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

impl SpeechClient for OpenAiSpeechClient {
    fn synthesize(&self, request: SpeechRequest) -> BoxFuture<'_, Result<Bytes, TtsError>> {
        async move {
            let url = self.speech_url();
            tracing::debug!(
                target: LOG_TARGET,
                %url,
                model = %request.model.as_str(),
                voice = %request.voice,
                chars = request.input.chars().count(),
                "sending speech request"
            );

            let response = self
                .client
                .post(&url)
                .bearer_auth(self.api_key.expose())
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = error_message(&body);
                tracing::warn!(target: LOG_TARGET, status = status.as_u16(), %message, "speech request rejected");
                return Err(TtsError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let audio = response.bytes().await?;
            tracing::debug!(target: LOG_TARGET, bytes = audio.len(), "speech received");
            Ok(audio)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::{Model, ResponseFormat, Voice};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct Captured {
        head: String,
        body: String,
    }

    /// Accepts one connection, records the request and answers with the given
    /// status line, content type and payload.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        payload: &'static [u8],
    ) -> (String, tokio::task::JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let (head, body_start) = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break (String::from_utf8_lossy(&buf[..pos]).to_string(), pos + 4);
                }
            };
            let content_length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < body_start + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8_lossy(&buf[body_start..]).to_string();

            let mut response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                payload.len()
            )
            .into_bytes();
            response.extend_from_slice(payload);
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.unwrap();

            Captured { head, body }
        });
        (format!("http://{addr}/v1"), handle)
    }

    fn request() -> SpeechRequest {
        SpeechRequest {
            model: Model::default(),
            voice: Voice::Nova,
            input: "Xin chào".into(),
            response_format: Some(ResponseFormat::Mp3),
        }
    }

    fn client(base_url: String) -> OpenAiSpeechClient {
        OpenAiSpeechClient::new(ApiKey::new("sk-test").unwrap()).with_base_url(base_url)
    }

    #[tokio::test]
    async fn posts_json_with_bearer_and_returns_audio_bytes() {
        let (base_url, server) = serve_once("200 OK", "audio/mpeg", b"ID3fake-mp3").await;

        let audio = client(base_url).synthesize(request()).await.unwrap();
        assert_eq!(&audio[..], b"ID3fake-mp3");

        let captured = server.await.unwrap();
        let head = captured.head.to_ascii_lowercase();
        assert!(head.starts_with("post /v1/audio/speech "));
        assert!(head.contains("authorization: bearer sk-test"));
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "tts-1",
                "voice": "nova",
                "input": "Xin chào",
                "response_format": "mp3"
            })
        );
    }

    #[tokio::test]
    async fn api_error_message_is_extracted_from_envelope() {
        let (base_url, server) = serve_once(
            "401 Unauthorized",
            "application/json",
            br#"{"error":{"message":"Incorrect API key provided: sk-test.","type":"invalid_request_error"}}"#,
        )
        .await;

        let err = client(base_url).synthesize(request()).await.unwrap_err();
        match err {
            TtsError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided: sk-test.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn empty_success_body_is_returned_as_is() {
        let (base_url, server) = serve_once("200 OK", "audio/mpeg", b"").await;

        let audio = client(base_url).synthesize(request()).await.unwrap();
        assert!(audio.is_empty());
        server.await.unwrap();
    }

    #[test]
    fn non_json_error_body_is_passed_through() {
        assert_eq!(error_message("  bad gateway \n"), "bad gateway");
        assert_eq!(error_message(""), "empty error response");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = client("http://localhost:9/v1/".into());
        assert_eq!(c.speech_url(), "http://localhost:9/v1/audio/speech");
    }
}
