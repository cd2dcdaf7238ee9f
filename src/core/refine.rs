//! Script refinement through the text model.
//!
//! The user picks a [`RefinementMode`]; its instruction is wrapped around the
//! current script and the model's reply replaces the script wholesale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::gemini::TextGenerator;
use crate::errors::{StudioError, StudioResult};

/// Rewrite style applied by the refiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinementMode {
    /// Formal, professional script
    #[default]
    Formal,
    /// Storytelling narration
    Story,
    /// Persuasive advertising copy
    Promo,
    /// Grammar fixes so the text reads naturally
    Natural,
}

impl RefinementMode {
    pub fn all() -> &'static [RefinementMode] {
        &[Self::Formal, Self::Story, Self::Promo, Self::Natural]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Story => "story",
            Self::Promo => "promo",
            Self::Natural => "natural",
        }
    }

    /// Instruction placed before the quoted script.
    pub fn instruction(&self, language: &str) -> String {
        match self {
            Self::Formal => {
                format!("Rewrite this text as a formal and professional script in {language}")
            }
            Self::Story => {
                format!("Rewrite this text as an engaging storytelling narration in {language}")
            }
            Self::Promo => {
                format!("Rewrite this text as persuasive promotional ad copy in {language}")
            }
            Self::Natural => {
                format!("Fix the grammar of this text so it sounds natural in {language}")
            }
        }
    }
}

impl fmt::Display for RefinementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefinementMode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formal" => Ok(Self::Formal),
            "story" => Ok(Self::Story),
            "promo" => Ok(Self::Promo),
            "natural" => Ok(Self::Natural),
            other => Err(StudioError::ValidationError(format!(
                "Unknown refinement mode '{other}'. Supported modes: formal, story, promo, natural"
            ))),
        }
    }
}

/// Rewrites scripts via the text model.
#[derive(Clone)]
pub struct ScriptRefiner {
    generator: TextGenerator,
    language: String,
}

impl ScriptRefiner {
    pub fn new(generator: TextGenerator, language: impl Into<String>) -> Self {
        Self {
            generator,
            language: language.into(),
        }
    }

    pub fn prompt(&self, script: &str, mode: RefinementMode) -> String {
        format!("{}: \"{script}\"", mode.instruction(&self.language))
    }

    /// Rewrite `script` in the style of `mode`.
    ///
    /// An empty or whitespace-only script is returned unchanged without a
    /// request. A reply without text also leaves the script unchanged.
    ///
    /// # Errors
    /// `RefinementError` when the request fails after retries.
    pub async fn refine(&self, script: &str, mode: RefinementMode) -> StudioResult<String> {
        if script.trim().is_empty() {
            debug!("Skipping refinement of empty script");
            return Ok(script.to_string());
        }

        let reply = self
            .generator
            .generate(&self.prompt(script, mode))
            .await
            .map_err(|e| StudioError::RefinementError(format!("Rewrite request failed: {e}")))?;

        match reply.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                info!(mode = %mode, chars = text.chars().count(), "Script refined");
                Ok(text.to_string())
            }
            _ => {
                warn!(mode = %mode, "Rewrite reply had no text; keeping script");
                Ok(script.to_string())
            }
        }
    }
}
