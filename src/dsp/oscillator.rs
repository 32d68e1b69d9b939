//! Sine carrier oscillator for the ring modulator.

use std::f64::consts::PI;

use crate::error::{Result, VoiceShiftError};

/// A phase-accumulating sine oscillator.
#[derive(Debug, Clone)]
pub struct Oscillator {
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    /// Carrier at `frequency` Hz. Carriers at or above Nyquist alias.
    pub fn sine(frequency: f64, sample_rate: f64) -> Result<Self> {
        if !(frequency > 0.0) || !frequency.is_finite() {
            return Err(VoiceShiftError::invalid_parameter(
                "carrier_hz",
                frequency,
                "must be a positive finite frequency",
            ));
        }
        Ok(Oscillator {
            frequency,
            phase: 0.0,
            sample_rate,
        })
    }

    /// Phase increment per sample.
    fn phase_inc(&self) -> f64 {
        self.frequency / self.sample_rate
    }

    /// Generate the next sample.
    pub fn next_sample(&mut self) -> f64 {
        let sample = (2.0 * PI * self.phase).sin();

        self.phase += self.phase_inc();
        self.phase -= self.phase.floor();

        sample
    }
}
