//! Session audio artifacts and their transient resource handles.
//!
//! A handle behaves like a browser object URL: it is minted when an artifact
//! is installed, resolves to the WAV bytes while live, and must be revoked
//! once the artifact is replaced.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::Mutex;
use time::OffsetDateTime;
use tracing::debug;

use crate::errors::StudioResult;

/// Mime type of every artifact.
pub const WAV_MIME_TYPE: &str = "audio/wav";

const HANDLE_SCHEME: &str = "blob:voiceover/";

/// Opaque, URL-like reference to a registered WAV buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(String);

impl ArtifactHandle {
    fn mint() -> Self {
        Self(format!("{HANDLE_SCHEME}{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live handles.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    blobs: Mutex<HashMap<ArtifactHandle, Bytes>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `wav` and mint a fresh handle for it.
    pub fn register(&self, wav: Bytes) -> ArtifactHandle {
        let handle = ArtifactHandle::mint();
        self.blobs.lock().insert(handle.clone(), wav);
        debug!(handle = %handle, "Registered artifact handle");
        handle
    }

    /// Release `handle`. Returns false if it was not live.
    pub fn revoke(&self, handle: &ArtifactHandle) -> bool {
        let removed = self.blobs.lock().remove(handle).is_some();
        if removed {
            debug!(handle = %handle, "Revoked artifact handle");
        }
        removed
    }

    /// Bytes behind a live handle.
    pub fn resolve(&self, handle: &ArtifactHandle) -> Option<Bytes> {
        self.blobs.lock().get(handle).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.blobs.lock().len()
    }
}

/// Audio produced by one synthesis, before it is given a handle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    /// Complete WAV container for `samples`
    pub wav: Bytes,
}

impl RenderedAudio {
    /// Playback length.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// The installed result of a synthesis: audio plus its live handle.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    audio: RenderedAudio,
    handle: ArtifactHandle,
    created_at: OffsetDateTime,
}

impl AudioArtifact {
    pub fn new(audio: RenderedAudio, handle: ArtifactHandle) -> Self {
        Self {
            audio,
            handle,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.audio.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    pub fn wav(&self) -> &Bytes {
        &self.audio.wav
    }

    pub fn handle(&self) -> &ArtifactHandle {
        &self.handle
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn duration_secs(&self) -> f64 {
        self.audio.duration_secs()
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    /// Download name, e.g. `VoiceOver-1760781234567.wav`.
    pub fn file_name(&self) -> String {
        let millis = self.created_at.unix_timestamp_nanos() / 1_000_000;
        format!("VoiceOver-{millis}.wav")
    }

    /// Write the WAV container into `dir` under [`AudioArtifact::file_name`].
    pub async fn save_to(&self, dir: &Path) -> StudioResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        tokio::fs::write(&path, &self.audio.wav).await?;
        debug!(path = %path.display(), bytes = self.audio.wav.len(), "Saved artifact");
        Ok(path)
    }
}
