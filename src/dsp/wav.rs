//! WAV boundary: canonical 16-bit PCM encode, hound-backed decode.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use crate::error::{Result, VoiceShiftError};

use super::buffer::PcmBuffer;

/// Convert a float sample to 16-bit: clamp, then scale by 0x8000 below zero
/// and 0x7fff otherwise, truncating toward zero.
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Inverse of [`sample_to_i16`] up to truncation.
pub fn i16_to_sample(sample: i16) -> f32 {
    if sample < 0 {
        sample as f32 / 32768.0
    } else {
        sample as f32 / 32767.0
    }
}

/// Encode a buffer as a 44-byte-header 16-bit PCM WAV with interleaved channels.
pub fn encode_wav(buffer: &PcmBuffer) -> Vec<u8> {
    let channels = buffer.num_channels() as u16;
    let sample_rate = buffer.sample_rate();
    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;
    let data_size = (buffer.len() * block_align as usize) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    let planes: Vec<&[f32]> = buffer.channels().collect();
    for i in 0..buffer.len() {
        for plane in &planes {
            buf.extend_from_slice(&sample_to_i16(plane[i]).to_le_bytes());
        }
    }

    buf
}

/// Decode a WAV payload (8/16/24/32-bit integer or 32-bit float PCM).
pub fn decode_wav(bytes: &[u8]) -> Result<PcmBuffer> {
    if bytes.is_empty() {
        return Err(VoiceShiftError::InvalidInput("empty WAV payload".into()));
    }
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "decoding wav"
    );

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(i16_to_sample))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, bits @ (8 | 24 | 32)) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
        (format, bits) => {
            return Err(VoiceShiftError::Decode(format!(
                "unsupported sample format {format:?} at {bits} bits"
            )));
        }
    };

    PcmBuffer::from_interleaved(spec.sample_rate, spec.channels as usize, &interleaved)
        .map_err(|e| VoiceShiftError::Decode(e.to_string()))
}
