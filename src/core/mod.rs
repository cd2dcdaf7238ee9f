pub mod audio;
pub mod client;
pub mod gemini;
pub mod refine;
pub mod synthesis;
pub mod tone;
pub mod voices;

// Re-export commonly used types for convenience
pub use audio::{ArtifactHandle, ArtifactStore, AudioArtifact, RenderedAudio};
pub use client::{BoxedTransport, ReqwestTransport, ResilientClient, RetryPolicy, Transport};
pub use gemini::TextGenerator;
pub use refine::{RefinementMode, ScriptRefiner};
pub use synthesis::{Pace, SpeedFactor, SynthesisOrchestrator, SynthesisRequest};
pub use tone::{ToneAnalyzer, ToneWatcher};
pub use voices::{VoiceGender, VoiceProfile};
