//! Engine configuration.
//!
//! The reference constants (filter Q, robot carrier mapping and mix weights,
//! analyzer geometry) live here so hosts can tune them from a JSON document.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoiceShiftError};

/// Top-level configuration passed to a [`crate::process::Processor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Q shared by the high-pass and low-pass stages.
    pub filter_q: f64,
    pub robot: RobotConfig,
    pub analyzer: AnalyzerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            filter_q: 0.707, // Butterworth
            robot: RobotConfig::default(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.filter_q > 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "filter_q",
                self.filter_q,
                "must be positive",
            ));
        }
        self.robot.validate()?;
        self.analyzer.validate()
    }
}

/// Ring-modulator constants.
///
/// Carrier frequency is `base_hz + amount * range_hz`; wet gain is
/// `amount * wet_scale` and dry gain is `1 - amount * dry_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RobotConfig {
    pub base_hz: f64,
    pub range_hz: f64,
    pub wet_scale: f64,
    pub dry_scale: f64,
    /// Amount used by the `Robot` preset.
    pub preset_amount: f64,
    /// Fixed carrier used by the `Robot` preset.
    pub preset_carrier_hz: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            base_hz: 30.0,
            range_hz: 70.0,
            wet_scale: 0.8,
            dry_scale: 0.5,
            preset_amount: 0.5,
            preset_carrier_hz: 50.0,
        }
    }
}

impl RobotConfig {
    pub fn carrier_for(&self, amount: f64) -> f64 {
        self.base_hz + amount * self.range_hz
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_hz > 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.base_hz",
                self.base_hz,
                "must be positive",
            ));
        }
        if !(self.range_hz >= 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.range_hz",
                self.range_hz,
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.wet_scale) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.wet_scale",
                self.wet_scale,
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.dry_scale) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.dry_scale",
                self.dry_scale,
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.preset_amount) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.preset_amount",
                self.preset_amount,
                "must be within [0, 1]",
            ));
        }
        if !(self.preset_carrier_hz > 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "robot.preset_carrier_hz",
                self.preset_carrier_hz,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Spectrum analyzer geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Transform size `F`.
    pub fft_size: usize,
    /// Upper bound on time columns; the canvas width may lower it.
    pub max_columns: usize,
    /// Log-frequency display rows.
    pub rows: usize,
    /// Lowest displayed frequency.
    pub min_freq_hz: f64,
    /// Level mapped to intensity 0; 0 dB maps to 1.
    pub floor_db: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            fft_size: 2048,
            max_columns: 200,
            rows: 128,
            min_freq_hz: 20.0,
            floor_db: -60.0,
        }
    }
}

impl AnalyzerConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.fft_size < 2 {
            return Err(VoiceShiftError::invalid_parameter(
                "analyzer.fft_size",
                self.fft_size as f64,
                "must be at least 2",
            ));
        }
        if self.max_columns == 0 {
            return Err(VoiceShiftError::invalid_parameter(
                "analyzer.max_columns",
                0.0,
                "must be at least 1",
            ));
        }
        if self.rows == 0 {
            return Err(VoiceShiftError::invalid_parameter(
                "analyzer.rows",
                0.0,
                "must be at least 1",
            ));
        }
        if !(self.min_freq_hz > 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "analyzer.min_freq_hz",
                self.min_freq_hz,
                "must be positive",
            ));
        }
        if !(self.floor_db < 0.0) {
            return Err(VoiceShiftError::invalid_parameter(
                "analyzer.floor_db",
                self.floor_db,
                "must be below 0 dB",
            ));
        }
        Ok(())
    }
}
