use tracing::{debug, info, warn};

use crate::core::gemini::TextGenerator;

/// Prompt asking for a one-word tone description of `script`.
pub fn tone_prompt(script: &str) -> String {
    format!(
        "Analyze this text and give 1 English adjective describing its speaking tone. \
         Answer with one word only. Text: \"{script}\""
    )
}

/// Normalize a model reply into a tone label.
///
/// Trims whitespace, strips double quotes and periods, and lowercases.
/// Returns `None` when nothing is left.
pub fn sanitize_tone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '.')
        .collect();
    let cleaned = cleaned.trim().to_lowercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// One-shot tone classification against the text model.
#[derive(Clone)]
pub struct ToneAnalyzer {
    generator: TextGenerator,
    min_chars: usize,
}

impl ToneAnalyzer {
    /// `min_chars` is the shortest script that will be sent for analysis.
    pub fn new(generator: TextGenerator, min_chars: usize) -> Self {
        Self {
            generator,
            min_chars,
        }
    }

    /// Classify the tone of `script`.
    ///
    /// Returns `None` without a request for blank scripts and scripts shorter
    /// than the minimum.
    /// Request failures are logged and also yield `None`; callers keep their
    /// previous suggestion.
    pub async fn analyze(&self, script: &str) -> Option<String> {
        let chars = script.chars().count();
        if script.trim().is_empty() || chars < self.min_chars {
            debug!(chars, min_chars = self.min_chars, "Script too short for tone analysis");
            return None;
        }

        match self.generator.generate(&tone_prompt(script)).await {
            Ok(Some(reply)) => {
                let tone = sanitize_tone(&reply);
                match &tone {
                    Some(t) => info!(tone = %t, "Tone detected"),
                    None => debug!("Tone reply was empty after cleanup"),
                }
                tone
            }
            Ok(None) => {
                debug!("Tone reply carried no text");
                None
            }
            Err(e) => {
                warn!(error = %e, "Tone analysis failed");
                None
            }
        }
    }
}
