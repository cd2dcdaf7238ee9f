//! End-to-End Mock Tests
//!
//! Drives a full `StudioSession` over real HTTP against a wiremock server
//! standing in for the text and speech models.
//!
//! Run: cargo test --test studio_mock_tests -- --nocapture

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voiceover_studio::{RefinementMode, StudioConfig, StudioError, StudioSession};

const SPEECH_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-tts:generateContent";
const TEXT_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

/// Helper function to create a configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> StudioConfig {
    StudioConfig {
        api_key: Some("test-key".to_string()),
        api_base_url: format!("{}/v1beta", server.uri()),
        max_retries: 5,
        initial_backoff_ms: 10,
        tone_enabled: false,
        tone_debounce_ms: 50,
        ..Default::default()
    }
}

fn audio_body(mime_type: &str, pcm: &[u8]) -> Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{ "inlineData": { "mimeType": mime_type, "data": BASE64.encode(pcm) } }]
            },
            "finishReason": "STOP"
        }]
    })
}

fn text_body(text: &str) -> Value {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    })
}

#[tokio::test]
async fn test_generate_writes_playable_wav() {
    let mock_server = MockServer::start().await;

    // Samples 1, -2, 0x1234 plus a dangling odd byte
    let pcm = [0x01, 0x00, 0xFE, 0xFF, 0x34, 0x12, 0x7F];
    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": { "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Charon" } } }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(audio_body("audio/L16;codec=pcm;rate=16000", &pcm)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = StudioSession::new(create_test_config(&mock_server)).unwrap();
    session.set_script("Selamat datang di acara kami.");
    session.set_voice("charon").unwrap();

    let artifact = session.generate().await.unwrap();
    assert_eq!(artifact.samples(), &[1, -2, 0x1234]);
    assert_eq!(artifact.sample_rate(), 16000);
    assert_eq!(artifact.wav().len(), 44 + 6);

    let output_dir = TempDir::new().unwrap();
    let saved = session.download(Some(output_dir.path())).await.unwrap();
    assert!(saved.file_name().unwrap().to_str().unwrap().starts_with("VoiceOver-"));

    let mut reader = hound::WavReader::open(&saved).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![1, -2, 0x1234]);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "overloaded"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body("audio/L16", &[9, 0])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = StudioSession::new(create_test_config(&mock_server)).unwrap();
    session.set_script("Coba lagi");

    let artifact = session.generate().await.unwrap();
    assert_eq!(artifact.samples(), &[9]);
    // No rate in the mime type
    assert_eq!(artifact.sample_rate(), 24000);
}

#[tokio::test]
async fn test_client_errors_are_retried_until_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad request"})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = StudioConfig {
        max_retries: 2,
        ..create_test_config(&mock_server)
    };
    let session = StudioSession::new(config).unwrap();
    session.set_script("Tidak akan berhasil");

    let err = session.generate().await.unwrap_err();
    assert!(matches!(err, StudioError::SynthesisError(_)));
    assert!(session.current_artifact().is_none());
}

#[tokio::test]
async fn test_reply_without_audio_is_synthesis_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("no audio here")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = StudioSession::new(create_test_config(&mock_server)).unwrap();
    session.set_script("Halo");

    let err = session.generate().await.unwrap_err();
    assert!(matches!(err, StudioError::SynthesisError(_)));
}

#[tokio::test]
async fn test_empty_script_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = StudioSession::new(create_test_config(&mock_server)).unwrap();
    session.set_script("  \t ");

    assert!(session.generate().await.unwrap_err().is_validation());
    assert_eq!(session.refine().await.unwrap(), "  \t ");
}

#[tokio::test]
async fn test_refine_then_generate_uses_refined_script() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{
                    "text": "Rewrite this text as persuasive promotional ad copy in Indonesian: \"kopi enak murah\""
                }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(
            "\nKopi nikmat, harga bersahabat!\n",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{
                    "text": "Speak in a professional tone at slow speed: \"Kopi nikmat, harga bersahabat!\""
                }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body("audio/L16;rate=24000", &[0, 1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = StudioSession::new(create_test_config(&mock_server)).unwrap();
    session.set_script("kopi enak murah");
    session.set_refinement_mode("promo".parse::<RefinementMode>().unwrap());
    session.set_speed(0.7).unwrap();

    let refined = session.refine().await.unwrap();
    assert_eq!(refined, "Kopi nikmat, harga bersahabat!");

    let artifact = session.generate().await.unwrap();
    assert_eq!(artifact.samples(), &[256]);
}

#[tokio::test]
async fn test_refine_failure_leaves_script() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = StudioConfig {
        max_retries: 1,
        ..create_test_config(&mock_server)
    };
    let session = StudioSession::new(config).unwrap();
    session.set_script("naskah asli");

    let err = session.refine().await.unwrap_err();
    assert!(matches!(err, StudioError::RefinementError(_)));
    assert_eq!(err.user_message(), "Failed to refine the script. Please try again.");
    assert_eq!(session.script(), "naskah asli");
}

#[tokio::test]
async fn test_debounced_tone_feeds_synthesis_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("\"Joyful.\"")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{
                    "text": "Narrate the following text with a joyful tone. Maintain a normal pace. \
                             The delivery should be expressive and professional. Text: \"Hari ini kita merayakan!\""
                }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(audio_body("audio/L16;rate=24000", &[1, 0])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = StudioConfig {
        tone_enabled: true,
        ..create_test_config(&mock_server)
    };
    let session = StudioSession::new(config).unwrap();

    // A burst of edits inside the debounce window
    session.set_script("Hari ini");
    session.set_script("Hari ini kita");
    session.set_script("Hari ini kita merayakan!");

    let mut waited = Duration::ZERO;
    while session.tone_suggestion().is_none() && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert_eq!(session.tone_suggestion().as_deref(), Some("joyful"));

    session.generate().await.unwrap();
    session.shutdown();
}
