//! Audio decoding, WAV transcoding and session artifacts.

pub mod artifact;
pub mod pcm;
pub mod wav;

pub use artifact::{ArtifactHandle, ArtifactStore, AudioArtifact, RenderedAudio, WAV_MIME_TYPE};
pub use pcm::{DEFAULT_SAMPLE_RATE, decode_base64_pcm, parse_sample_rate, samples_from_le_bytes};
