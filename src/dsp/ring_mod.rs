//! Ring modulator: the "robot" voice.
//!
//! `out = src * wet * carrier(t) + src * dry`, clipped to [-1, 1], where
//! `wet = amount * wet_scale` and `dry = 1 - amount * dry_scale`. One carrier
//! drives every channel so stereo images stay phase-aligned.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::RobotConfig;
use crate::error::{Result, VoiceShiftError};

use super::buffer::PcmBuffer;
use super::mixer::Mixer;
use super::oscillator::Oscillator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSpec {
    /// Effect depth in [0, 1]; 0 passes the signal through unchanged.
    pub amount: f64,
    /// Carrier frequency in Hz.
    pub carrier_hz: f64,
}

impl RobotSpec {
    /// Derive the carrier from `amount` (`base_hz + amount * range_hz`).
    pub fn from_amount(amount: f64, config: &RobotConfig) -> Self {
        RobotSpec {
            amount,
            carrier_hz: config.carrier_for(amount),
        }
    }

    /// Use a fixed carrier regardless of `amount`.
    pub fn with_carrier(amount: f64, carrier_hz: f64) -> Self {
        RobotSpec { amount, carrier_hz }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.amount) {
            return Err(VoiceShiftError::invalid_parameter(
                "amount",
                self.amount,
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

pub fn apply(input: &PcmBuffer, spec: &RobotSpec, config: &RobotConfig) -> Result<PcmBuffer> {
    spec.validate()?;
    let mut carrier = Oscillator::sine(spec.carrier_hz, input.sample_rate() as f64)?;
    let modulation: Vec<f64> = (0..input.len()).map(|_| carrier.next_sample()).collect();

    let wet = spec.amount * config.wet_scale;
    let dry = 1.0 - spec.amount * config.dry_scale;
    trace!(wet, dry, carrier_hz = spec.carrier_hz, "ring modulator gains");

    input.map_channels(|samples| {
        let mut mixer = Mixer::new(samples.len());
        for (i, (&s, &m)) in samples.iter().zip(&modulation).enumerate() {
            mixer.add(i, s as f64 * wet * m);
        }
        mixer.add_scaled(samples, dry);
        mixer.output()
    })
}
