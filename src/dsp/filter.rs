//! Biquad filter node: high-pass / low-pass shaping of a whole buffer.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoiceShiftError};

use super::buffer::PcmBuffer;

/// Filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Lowpass,
    Highpass,
}

/// Which side of the spectrum to keep, and where to cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub kind: FilterType,
    pub cutoff_hz: f64,
}

impl FilterSpec {
    pub fn highpass(cutoff_hz: f64) -> Self {
        FilterSpec {
            kind: FilterType::Highpass,
            cutoff_hz,
        }
    }

    pub fn lowpass(cutoff_hz: f64) -> Self {
        FilterSpec {
            kind: FilterType::Lowpass,
            cutoff_hz,
        }
    }

    /// The cutoff must sit strictly between 0 Hz and Nyquist.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        let nyquist = sample_rate as f64 / 2.0;
        if !(self.cutoff_hz > 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "cutoff_hz",
                self.cutoff_hz,
                "must be positive",
            ));
        }
        if self.cutoff_hz >= nyquist {
            return Err(VoiceShiftError::invalid_parameter(
                "cutoff_hz",
                self.cutoff_hz,
                format!("must be below Nyquist ({nyquist} Hz)"),
            ));
        }
        Ok(())
    }
}

/// A biquad IIR filter (2nd order).
///
/// Implements the standard Direct Form II Transposed structure.
/// Coefficient formulas from the Audio EQ Cookbook (Robert Bristow-Johnson).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    // Coefficients, normalized by a0
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    // State (Direct Form II Transposed)
    z1: f64,
    z2: f64,
}

impl BiquadFilter {
    pub fn new(filter_type: FilterType, frequency: f64, q: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * PI * frequency / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let (b0, b1, b2) = match filter_type {
            FilterType::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterType::Highpass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0)
            }
        };
        let a0 = 1.0 + alpha;

        BiquadFilter {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Process a single sample through the filter.
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Reset filter state.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Filter every channel of `input` with a fresh biquad per channel.
///
/// Output has the same length, channel count, and rate.
pub fn apply(input: &PcmBuffer, spec: &FilterSpec, q: f64) -> Result<PcmBuffer> {
    spec.validate(input.sample_rate())?;
    let mut filter = BiquadFilter::new(spec.kind, spec.cutoff_hz, q, input.sample_rate() as f64);
    input.map_channels(|samples| {
        filter.reset();
        samples
            .iter()
            .map(|&s| filter.process(s as f64) as f32)
            .collect()
    })
}
