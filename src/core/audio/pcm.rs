//! Raw PCM payload handling for speech replies.

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use regex::Regex;

use crate::errors::{StudioError, StudioResult};

/// Sample rate assumed when the mime type does not declare one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

static RATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rate=(\d+)").expect("rate pattern is a valid regex")
});

/// Extract the `rate=<n>` parameter from a mime type such as
/// `audio/L16;codec=pcm;rate=24000`.
///
/// Falls back to [`DEFAULT_SAMPLE_RATE`] when the parameter is missing,
/// does not fit in a `u32`, or is zero.
pub fn parse_sample_rate(mime_type: &str) -> u32 {
    RATE_PATTERN
        .captures(mime_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|rate| *rate > 0)
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Reinterpret little-endian byte pairs as signed 16-bit samples.
///
/// `M` bytes yield `M / 2` samples; a trailing odd byte is dropped.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| ((u16::from(pair[1]) << 8) | u16::from(pair[0])) as i16)
        .collect()
}

/// Decode a base64 payload of little-endian PCM into samples.
pub fn decode_base64_pcm(data: &str) -> StudioResult<Vec<i16>> {
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| StudioError::SynthesisError(format!("Base64 decode error: {e}")))?;
    Ok(samples_from_le_bytes(&bytes))
}
