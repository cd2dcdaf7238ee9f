use bytes::Bytes;
use tracing::{debug, error, info};

use super::prompt::{SpeedFactor, compose_prompt};
use crate::core::audio::{RenderedAudio, decode_base64_pcm, parse_sample_rate, wav};
use crate::core::client::ResilientClient;
use crate::core::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::core::voices::VoiceProfile;
use crate::errors::{StudioError, StudioResult};

/// Everything one synthesis needs, captured at the moment it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub script: String,
    pub voice: VoiceProfile,
    pub speed: SpeedFactor,
    pub tone_enabled: bool,
    pub tone: Option<String>,
}

impl SynthesisRequest {
    /// Prompt sent to the speech model.
    ///
    /// The tone is only used when the feature is enabled and a suggestion exists.
    pub fn prompt(&self) -> String {
        let tone = self
            .tone
            .as_deref()
            .filter(|_| self.tone_enabled)
            .filter(|t| !t.is_empty());
        compose_prompt(&self.script, self.speed.pace(), tone)
    }

    /// Fail fast on a script with nothing to say.
    pub fn validate(&self) -> StudioResult<()> {
        if self.script.trim().is_empty() {
            return Err(StudioError::ValidationError(
                "Enter some text first.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turns a [`SynthesisRequest`] into decoded audio and a WAV container.
#[derive(Clone)]
pub struct SynthesisOrchestrator {
    client: ResilientClient,
    endpoint: String,
}

impl SynthesisOrchestrator {
    pub fn new(client: ResilientClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Run one synthesis.
    ///
    /// # Errors
    /// - `ValidationError` for an empty or whitespace-only script (no request is made)
    /// - `SynthesisError` when the speech call fails after retries or the reply
    ///   carries no decodable audio
    pub async fn synthesize(&self, request: &SynthesisRequest) -> StudioResult<RenderedAudio> {
        request.validate()?;

        let prompt = request.prompt();
        debug!(
            voice = request.voice.id,
            pace = %request.speed.pace(),
            tone = request.tone.as_deref().unwrap_or("-"),
            "Requesting speech synthesis"
        );

        let body = GenerateContentRequest::speech(prompt, request.voice.id);
        let response: GenerateContentResponse = self
            .client
            .call_json(&self.endpoint, &body)
            .await
            .map_err(|e| {
                error!(voice = request.voice.id, error = %e, "Speech request failed");
                StudioError::SynthesisError(format!("Speech request failed: {e}"))
            })?;

        let inline = response.first_inline_data().ok_or_else(|| {
            StudioError::SynthesisError("Speech reply contained no audio data".to_string())
        })?;

        let sample_rate = parse_sample_rate(&inline.mime_type);
        let samples = decode_base64_pcm(&inline.data)?;
        let wav = Bytes::from(wav::encode(&samples, sample_rate));

        let audio = RenderedAudio {
            samples,
            sample_rate,
            wav,
        };

        info!(
            voice = request.voice.id,
            samples = audio.samples.len(),
            sample_rate,
            duration_secs = audio.duration_secs(),
            "Speech synthesis complete"
        );

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::RetryPolicy;
    use crate::core::client::testing::{MockTransport, audio_reply, text_reply};
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const ENDPOINT: &str = "http://mock/models/tts:generateContent";

    fn orchestrator(transport: Arc<MockTransport>) -> SynthesisOrchestrator {
        let client = ResilientClient::new(transport, RetryPolicy::new(2, Duration::from_millis(10)));
        SynthesisOrchestrator::new(client, ENDPOINT)
    }

    fn request(script: &str) -> SynthesisRequest {
        SynthesisRequest {
            script: script.to_string(),
            voice: *VoiceProfile::find("Charon").unwrap(),
            speed: SpeedFactor::new(1.0).unwrap(),
            tone_enabled: true,
            tone: None,
        }
    }

    #[test]
    fn test_prompt_uses_tone_only_when_enabled() {
        let mut req = request("Hello");
        req.tone = Some("calm".to_string());
        assert!(req.prompt().contains("with a calm tone"));

        req.tone_enabled = false;
        assert_eq!(req.prompt(), "Speak in a professional tone at normal speed: \"Hello\"");

        req.tone_enabled = true;
        req.tone = None;
        assert!(req.prompt().starts_with("Speak in a professional tone"));
    }

    #[tokio::test]
    async fn test_empty_script_makes_no_request() {
        let transport = Arc::new(MockTransport::new());
        let orchestrator = orchestrator(transport.clone());

        for script in ["", "   ", "\n\t"] {
            let result = orchestrator.synthesize(&request(script)).await;
            assert!(matches!(result, Err(StudioError::ValidationError(_))));
        }
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_synthesize_decodes_audio() {
        let pcm: Vec<u8> = vec![0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80];
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(audio_reply("audio/L16;codec=pcm;rate=16000", &BASE64.encode(&pcm)));

        let audio = orchestrator(transport.clone())
            .synthesize(&request("Selamat pagi"))
            .await
            .unwrap();

        assert_eq!(audio.samples, vec![1, -1, i16::MIN]);
        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.wav.len(), 44 + pcm.len());
        assert_eq!(&audio.wav[44..], &pcm[..]);

        let requests = transport.requests();
        assert_eq!(requests[0].0, ENDPOINT);
        assert_eq!(
            requests[0].1["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            json!("Charon")
        );
        assert_eq!(
            requests[0].1["generationConfig"]["responseModalities"],
            json!(["AUDIO"])
        );
    }

    #[tokio::test]
    async fn test_missing_rate_defaults_to_24k() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(audio_reply("audio/L16", &BASE64.encode([0u8, 0])));

        let audio = orchestrator(transport).synthesize(&request("Hi")).await.unwrap();
        assert_eq!(audio.sample_rate, 24000);
    }

    #[tokio::test]
    async fn test_reply_without_audio_is_synthesis_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(text_reply("I cannot speak"));

        let result = orchestrator(transport).synthesize(&request("Hi")).await;
        assert!(matches!(result, Err(StudioError::SynthesisError(_))));
    }

    #[tokio::test]
    async fn test_bad_base64_is_synthesis_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(audio_reply("audio/L16;rate=24000", "@@@"));

        let result = orchestrator(transport).synthesize(&request("Hi")).await;
        assert!(matches!(result, Err(StudioError::SynthesisError(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_is_synthesis_error() {
        let transport = Arc::new(MockTransport::new());
        transport.set_fallback(Err(StudioError::NetworkError("HTTP error! status: 500".into())));

        let result = orchestrator(transport.clone()).synthesize(&request("Hi")).await;
        assert!(matches!(result, Err(StudioError::SynthesisError(_))));
        assert_eq!(transport.call_count(), 3);
    }
}
