//! Named presets (easy mode) and tunable parameters (advanced mode).
//!
//! Wire names and JSON keys match the front-end: presets are `lowCut`,
//! `highCut`, `female`, `male`, `robot`; advanced parameters are
//! `pitchShift`, `lowCutFreq`, `highCutFreq`, `robotEffect`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::dsp::filter::FilterSpec;
use crate::dsp::pipeline::{Pipeline, Stage};
use crate::dsp::resampler::PitchSpec;
use crate::dsp::ring_mod::RobotSpec;
use crate::error::{Result, VoiceShiftError};

// ── Presets ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// High-pass at 1 kHz.
    LowCut,
    /// Low-pass at 500 Hz.
    HighCut,
    /// Pitch up by 1.3×.
    Female,
    /// Pitch down to 0.75×.
    Male,
    /// Ring modulation with a fixed carrier.
    Robot,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::LowCut,
        Preset::HighCut,
        Preset::Female,
        Preset::Male,
        Preset::Robot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::LowCut => "lowCut",
            Preset::HighCut => "highCut",
            Preset::Female => "female",
            Preset::Male => "male",
            Preset::Robot => "robot",
        }
    }

    /// Display label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Preset::LowCut => "低音を消す",
            Preset::HighCut => "高音を消す",
            Preset::Female => "女の人の声にする",
            Preset::Male => "男の人の声にする",
            Preset::Robot => "ロボットにする",
        }
    }

    /// The single node application this preset stands for.
    pub fn stage(&self, config: &EngineConfig) -> Stage {
        match self {
            Preset::LowCut => Stage::Filter(FilterSpec::highpass(1000.0)),
            Preset::HighCut => Stage::Filter(FilterSpec::lowpass(500.0)),
            Preset::Female => Stage::Pitch(PitchSpec { factor: 1.3 }),
            Preset::Male => Stage::Pitch(PitchSpec { factor: 0.75 }),
            Preset::Robot => Stage::Robot(RobotSpec::with_carrier(
                config.robot.preset_amount,
                config.robot.preset_carrier_hz,
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = VoiceShiftError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| VoiceShiftError::InvalidInput(format!("unknown preset '{s}'")))
    }
}

// ── Advanced parameters ─────────────────────────────────────

/// Slider values from advanced mode. Each stage is skipped at its neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedParams {
    /// -50..=50; ±50 is one octave. 0 disables pitch change.
    pub pitch_shift: i32,
    /// 0..=2000 Hz; at or below 20 Hz the high-pass is skipped.
    pub low_cut_freq: f64,
    /// 500..=8000 Hz; at 8000 Hz the low-pass is skipped.
    pub high_cut_freq: f64,
    /// 0..=100; 0 disables the ring modulator.
    pub robot_effect: i32,
}

impl Default for AdvancedParams {
    fn default() -> Self {
        AdvancedParams {
            pitch_shift: 0,
            low_cut_freq: 0.0,
            high_cut_freq: HIGH_CUT_OFF_HZ,
            robot_effect: 0,
        }
    }
}

/// High-pass cutoffs at or below this are inaudible and skipped.
pub const LOW_CUT_FLOOR_HZ: f64 = 20.0;
/// Low-pass cutoffs at or above this are treated as "off".
pub const HIGH_CUT_OFF_HZ: f64 = 8000.0;

impl AdvancedParams {
    pub fn validate(&self) -> Result<()> {
        if !(-50..=50).contains(&self.pitch_shift) {
            return Err(VoiceShiftError::invalid_parameter(
                "pitch_shift",
                self.pitch_shift as f64,
                "must be within [-50, 50]",
            ));
        }
        if !(0.0..=2000.0).contains(&self.low_cut_freq) {
            return Err(VoiceShiftError::invalid_parameter(
                "low_cut_freq",
                self.low_cut_freq,
                "must be within [0, 2000] Hz",
            ));
        }
        if !(500.0..=HIGH_CUT_OFF_HZ).contains(&self.high_cut_freq) {
            return Err(VoiceShiftError::invalid_parameter(
                "high_cut_freq",
                self.high_cut_freq,
                "must be within [500, 8000] Hz",
            ));
        }
        if !(0..=100).contains(&self.robot_effect) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot_effect",
                self.robot_effect as f64,
                "must be within [0, 100]",
            ));
        }
        Ok(())
    }

    /// Build the conditional pitch → high-pass → low-pass → robot pipeline.
    pub fn pipeline(&self, config: &EngineConfig) -> Result<Pipeline> {
        self.validate()?;
        let mut pipeline = Pipeline::new();
        if self.pitch_shift != 0 {
            pipeline.push(Stage::Pitch(PitchSpec::from_shift(self.pitch_shift)));
        }
        if self.low_cut_freq > LOW_CUT_FLOOR_HZ {
            pipeline.push(Stage::Filter(FilterSpec::highpass(self.low_cut_freq)));
        }
        if self.high_cut_freq < HIGH_CUT_OFF_HZ {
            pipeline.push(Stage::Filter(FilterSpec::lowpass(self.high_cut_freq)));
        }
        if self.robot_effect > 0 {
            let amount = self.robot_effect as f64 / 100.0;
            pipeline.push(Stage::Robot(RobotSpec::from_amount(amount, &config.robot)));
        }
        Ok(pipeline)
    }
}
