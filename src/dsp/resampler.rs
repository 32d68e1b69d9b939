//! Pitch node: playback-rate resampling.
//!
//! Reads the input at `factor`× speed with linear interpolation into an
//! output of `floor(len / factor)` samples at the same sample rate. Pitch and
//! duration change together; there is no formant or tempo preservation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoiceShiftError};

use super::buffer::PcmBuffer;

/// Longest output, in frames per channel, a pitch stage may produce.
pub const MAX_OUTPUT_FRAMES: usize = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSpec {
    /// Playback rate; `> 1` raises pitch and shortens the clip.
    pub factor: f64,
}

impl PitchSpec {
    /// `shift` in [-50, 50] maps to one octave down / up.
    pub fn from_shift(shift: i32) -> Self {
        PitchSpec {
            factor: 2.0_f64.powf(shift as f64 / 50.0),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.factor > 0.0) || !self.factor.is_finite() {
            return Err(VoiceShiftError::invalid_parameter(
                "factor",
                self.factor,
                "must be a positive finite number",
            ));
        }
        Ok(())
    }

    /// `floor(input_len / factor)`, refused past [`MAX_OUTPUT_FRAMES`].
    pub fn output_len(&self, input_len: usize) -> Result<usize> {
        let frames = (input_len as f64 / self.factor).floor();
        if !frames.is_finite() || frames > MAX_OUTPUT_FRAMES as f64 {
            return Err(VoiceShiftError::invalid_parameter(
                "factor",
                self.factor,
                format!("would stretch {input_len} frames past {MAX_OUTPUT_FRAMES}"),
            ));
        }
        Ok(frames as usize)
    }
}

pub fn apply(input: &PcmBuffer, spec: &PitchSpec) -> Result<PcmBuffer> {
    spec.validate()?;
    let out_len = spec.output_len(input.len())?;
    let channels = (0..input.num_channels())
        .map(|ch| {
            (0..out_len)
                .map(|i| input.read_interpolated(ch, i as f64 * spec.factor) as f32)
                .collect()
        })
        .collect();
    PcmBuffer::new(input.sample_rate(), channels)
}
