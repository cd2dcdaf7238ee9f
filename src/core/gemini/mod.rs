//! Generative Language (`generateContent`) API bindings.
//!
//! The studio talks to two models through the same endpoint shape:
//!
//! - a text model, used for tone analysis and script refinement
//! - a speech model, used for synthesis with audio-only output
//!
//! Both are reached through the [`ResilientClient`].

pub mod messages;

pub use messages::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
    ResponseModality,
};

use crate::core::client::ResilientClient;
use crate::errors::StudioResult;

/// Thin wrapper for text-in, text-out calls against the text model.
#[derive(Clone)]
pub struct TextGenerator {
    client: ResilientClient,
    endpoint: String,
}

impl TextGenerator {
    pub fn new(client: ResilientClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Send `prompt` and return the first candidate's text, if any.
    pub async fn generate(&self, prompt: &str) -> StudioResult<Option<String>> {
        let request = GenerateContentRequest::text(prompt);
        let response: GenerateContentResponse =
            self.client.call_json(&self.endpoint, &request).await?;
        Ok(response.first_text().map(str::to_string))
    }
}
