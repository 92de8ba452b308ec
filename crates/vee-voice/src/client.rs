//! Whisper-style transcription and TTS over an OpenAI-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{Result, VoiceError};
use crate::types::{normalize_language, AudioFormat, Transcript};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Trait for the speech service.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Transcribe an audio upload, returning text and a normalized
    /// `ar`/`en` language tag.
    async fn speech_to_text(&self, audio: &[u8], format: AudioFormat) -> Result<Transcript>;

    /// Synthesize speech for `text`, returning MP3 bytes.
    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>>;
}

/// Connection settings for the speech endpoints.
#[derive(Clone, Debug)]
pub struct SpeechConfig {
    /// Transcription model, e.g. `whisper-1`.
    pub stt_model: String,
    /// Synthesis model, e.g. `tts-1`.
    pub tts_model: String,
    /// Synthesis voice, e.g. `alloy`.
    pub tts_voice: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token. Required; construction fails without one.
    pub api_key: Option<String>,
}

/// [`SpeechClient`] over OpenAI-compatible `/audio/*` endpoints.
#[derive(Debug)]
pub struct OpenAiSpeechClient {
    client: reqwest::Client,
    config: SpeechConfig,
    api_key: String,
}

/// `verbose_json` transcription response; `language` is a full language
/// name ("arabic") on some models and an ISO code on others.
#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl OpenAiSpeechClient {
    /// Build a client from `config`.
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(VoiceError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(VoiceError::Http)?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, op: &str) -> String {
        format!("{}/audio/{op}", self.config.base_url.trim_end_matches('/'))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(VoiceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpeechClient for OpenAiSpeechClient {
    async fn speech_to_text(&self, audio: &[u8], format: AudioFormat) -> Result<Transcript> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", format.extension()))
            .mime_str(format.mime())
            .map_err(VoiceError::Http)?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.stt_model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let parsed: TranscriptionResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| VoiceError::InvalidResponse(e.to_string()))?;

        let language = normalize_language(parsed.language.as_deref(), &parsed.text);
        debug!(
            chars = parsed.text.len(),
            language, "transcription received"
        );
        Ok(Transcript {
            text: parsed.text,
            language,
        })
    }

    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "model": self.config.tts_model,
            "voice": self.config.tts_voice,
            "input": text,
        });
        let response = self
            .client
            .post(self.endpoint("speech"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let audio = Self::check_status(response).await?.bytes().await?;
        debug!(bytes = audio.len(), "speech synthesized");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiSpeechClient {
        OpenAiSpeechClient::new(SpeechConfig {
            stt_model: "whisper-1".into(),
            tts_model: "tts-1".into(),
            tts_voice: "alloy".into(),
            base_url: server.uri(),
            api_key: Some("sk-test".into()),
        })
        .unwrap()
    }

    #[test]
    fn construction_requires_api_key() {
        let err = OpenAiSpeechClient::new(SpeechConfig {
            stt_model: "whisper-1".into(),
            tts_model: "tts-1".into(),
            tts_voice: "alloy".into(),
            base_url: "http://localhost".into(),
            api_key: None,
        })
        .unwrap_err();
        assert_matches!(err, VoiceError::MissingApiKey);
    }

    #[tokio::test]
    async fn transcription_returns_text_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "text": "ما هي وجبة الفطور الصحية؟",
                "language": "arabic"
            })))
            .mount(&server)
            .await;

        let transcript = client_for(&server)
            .speech_to_text(b"fake-audio", AudioFormat::Webm)
            .await
            .unwrap();
        assert_eq!(transcript.text, "ما هي وجبة الفطور الصحية؟");
        assert_eq!(transcript.language, "ar");
    }

    #[tokio::test]
    async fn missing_language_falls_back_to_script_detection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"text": "كم سعرة في التمر؟"})),
            )
            .mount(&server)
            .await;

        let transcript = client_for(&server)
            .speech_to_text(b"fake-audio", AudioFormat::Mp3)
            .await
            .unwrap();
        assert_eq!(transcript.language, "ar");
    }

    #[tokio::test]
    async fn transcription_sends_multipart_with_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"text": "hi", "language": "en"})),
            )
            .mount(&server)
            .await;

        client_for(&server)
            .speech_to_text(b"fake-audio", AudioFormat::Wav)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("whisper-1"));
        assert!(body.contains("verbose_json"));
        assert!(body.contains("audio.wav"));
    }

    #[tokio::test]
    async fn tts_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3mp3-bytes".to_vec()))
            .mount(&server)
            .await;

        let audio = client_for(&server).text_to_speech("hello").await.unwrap();
        assert_eq!(audio, b"ID3mp3-bytes");
    }

    #[tokio::test]
    async fn api_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad voice"))
            .mount(&server)
            .await;

        let err = client_for(&server).text_to_speech("hello").await.unwrap_err();
        assert_matches!(err, VoiceError::Api { status: 400, .. });
    }
}
