//! Request and response message types for the `generateContent` API.
//!
//! Both the text model and the speech model share this envelope:
//!
//! ```json
//! {
//!   "contents": [{ "parts": [{ "text": "Speak in a professional tone at normal speed: \"Hi\"" }] }],
//!   "generationConfig": {
//!     "responseModalities": ["AUDIO"],
//!     "speechConfig": { "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Kore" } } }
//!   }
//! }
//! ```
//!
//! Replies carry `candidates[0].content.parts[0]`, holding either `text` or
//! `inlineData { mimeType, data }` with base64 audio.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request
// =============================================================================

/// Top-level `generateContent` request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Plain text prompt for the text model.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            generation_config: None,
        }
    }

    /// Prompt for the speech model, asking for audio only in `voice_name`.
    pub fn speech(prompt: impl Into<String>, voice_name: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![ResponseModality::Audio],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.into(),
                        },
                    },
                }),
            }),
        }
    }
}

/// A message made of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

/// One part of a message: text or inline binary data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64 payload with its mime type, e.g. `audio/L16;codec=pcm;rate=24000`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// Output modalities the model may produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<ResponseModality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

// =============================================================================
// Response
// =============================================================================

/// Top-level `generateContent` response body.
///
/// Every field is optional so that partial replies still parse; the accessors
/// return `None` where the original reply had nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_part(&self) -> Option<&Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.first_part().and_then(|p| p.text.as_deref())
    }

    /// Inline data of the first part of the first candidate.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_part().and_then(|p| p.inline_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_request_shape() {
        let request = GenerateContentRequest::text("Hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "contents": [{ "parts": [{ "text": "Hello" }] }] }));
    }

    #[test]
    fn test_speech_request_shape() {
        let request = GenerateContentRequest::speech("Say hi", "Puck");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{ "parts": [{ "text": "Say hi" }] }],
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {
                        "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": "Puck" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_text_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "cheerful" }], "role": "model" },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("cheerful"));
        assert!(response.first_inline_data().is_none());
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_audio_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAA=" } }]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert_eq!(inline.data, "AAA=");
    }

    #[test]
    fn test_empty_response_parsing() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_inline_data().is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert!(response.first_text().is_none());
    }
}
