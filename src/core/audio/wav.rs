//! PCM to WAV transcoding.
//!
//! The container is the canonical 44-byte RIFF header followed by mono
//! 16-bit little-endian samples. The RIFF size field is written as
//! `32 + data_size`, which players accept as-is.

use std::io::Cursor;

use crate::errors::{StudioError, StudioResult};

/// WAV header size (44 bytes).
pub const HEADER_SIZE: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

/// Encode mono 16-bit samples into a complete WAV file.
///
/// # Arguments
/// * `samples` - PCM samples, one per frame
/// * `sample_rate` - Sample rate in Hz (typically 24000)
///
/// # Returns
/// A Vec<u8> of exactly `44 + 2 * samples.len()` bytes.
pub fn encode(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let byte_rate = sample_rate.wrapping_mul(u32::from(BLOCK_ALIGN));

    let mut wav = Vec::with_capacity(HEADER_SIZE + samples.len() * 2);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(32 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // Subchunk1Size (16 for PCM)
    wav.extend_from_slice(&1u16.to_le_bytes()); // AudioFormat (1 = PCM)
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// Read a mono 16-bit PCM WAV file back into samples and its sample rate.
pub fn decode(bytes: &[u8]) -> StudioResult<(Vec<i16>, u32)> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| StudioError::SynthesisError(format!("Invalid WAV data: {e}")))?;
    let spec = reader.spec();

    if spec.channels != CHANNELS
        || spec.bits_per_sample != BITS_PER_SAMPLE
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(StudioError::SynthesisError(format!(
            "Unsupported WAV format: {} channels, {} bits",
            spec.channels, spec.bits_per_sample
        )));
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StudioError::SynthesisError(format!("Failed to read WAV samples: {e}")))?;

    Ok((samples, spec.sample_rate))
}
