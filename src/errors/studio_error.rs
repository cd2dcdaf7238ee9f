//! Error taxonomy shared by every stage of the voice-over pipeline.
//!
//! Errors are split by where they surface:
//!
//! - `ValidationError` is raised before any network call is made
//! - `NetworkError` only after the retry budget is exhausted
//! - `SynthesisError` / `RefinementError` wrap failures of the two user-facing operations
//!
//! Tone analysis failures never reach this type's callers; they are logged and dropped.

use thiserror::Error;

/// Errors produced by the studio pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StudioError {
    /// Transport or HTTP failure that survived every retry
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid input rejected before any request was issued
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The speech call failed or returned no usable audio
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    /// The rewrite call failed after retries
    #[error("Refinement error: {0}")]
    RefinementError(String),

    /// Request or response body did not match the expected JSON shape
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration or client construction failure
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Writing an artifact to disk failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A newer synthesis started before this one finished
    #[error("Synthesis superseded by a newer request")]
    Superseded,
}

impl StudioError {
    /// Message suitable for showing to the person using the studio.
    ///
    /// Validation messages are shown verbatim; everything else is collapsed
    /// into a short retry hint so transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError(msg) => msg.clone(),
            Self::RefinementError(_) => "Failed to refine the script. Please try again.".to_string(),
            Self::SynthesisError(_) | Self::NetworkError(_) | Self::SerializationError(_) => {
                "Something went wrong while generating the voice. Please try again later."
                    .to_string()
            }
            Self::ConfigurationError(msg) => format!("Studio is misconfigured: {msg}"),
            Self::Io(_) => "Failed to save the audio file.".to_string(),
            Self::Superseded => "A newer voice-over request replaced this one.".to_string(),
        }
    }

    /// Whether this error was raised before any network traffic happened.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

/// Result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
