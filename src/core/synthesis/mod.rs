//! Speech synthesis orchestration.
//!
//! A synthesis runs in four steps:
//!
//! 1. Classify the speed into a [`Pace`] bucket
//! 2. Compose the narration prompt (tone-aware when a suggestion is available)
//! 3. Call the speech model through the resilient client, voice pinned to the selection
//! 4. Decode the inline base64 PCM and wrap it in a WAV container

mod orchestrator;
mod prompt;

pub use orchestrator::{SynthesisOrchestrator, SynthesisRequest};
pub use prompt::{MAX_SPEED, MIN_SPEED, Pace, SpeedFactor, compose_prompt};
