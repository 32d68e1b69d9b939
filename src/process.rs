//! Processing facade: the operations the front-end calls.
//!
//! A [`Processor`] holds only configuration; each call builds its own render
//! context and output buffer, so independent calls (for example analyzing the
//! original and the processed clip) may run on separate threads.

use tracing::debug;

use crate::config::EngineConfig;
use crate::dsp::buffer::PcmBuffer;
use crate::dsp::pipeline::{Pipeline, RenderContext};
use crate::dsp::spectrum::{SpectrumAnalyzer, SpectrumGrid};
use crate::error::{Result, VoiceShiftError};
use crate::preset::{AdvancedParams, Preset};

/// A processed clip together with the preset that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetOutput {
    pub preset: Preset,
    pub buffer: PcmBuffer,
}

#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: EngineConfig,
}

impl Processor {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Processor { config })
    }

    /// Apply one preset as a single-stage render.
    pub fn process_preset(&self, buffer: &PcmBuffer, preset: Preset) -> Result<PresetOutput> {
        ensure_audio(buffer)?;
        let pipeline = Pipeline::single(preset.stage(&self.config));
        debug!(%preset, len = buffer.len(), "processing preset");
        let buffer = pipeline.render(buffer, &RenderContext::new(&self.config))?;
        Ok(PresetOutput { preset, buffer })
    }

    /// The stages `process_advanced` would run for `params`.
    pub fn advanced_pipeline(&self, params: &AdvancedParams) -> Result<Pipeline> {
        params.pipeline(&self.config)
    }

    /// Apply the conditional pitch → high-pass → low-pass → robot chain.
    pub fn process_advanced(&self, buffer: &PcmBuffer, params: &AdvancedParams) -> Result<PcmBuffer> {
        ensure_audio(buffer)?;
        let pipeline = self.advanced_pipeline(params)?;
        debug!(stages = pipeline.len(), len = buffer.len(), "processing advanced");
        pipeline.render(buffer, &RenderContext::new(&self.config))
    }

    /// Spectrum grid with the configured maximum column count.
    pub fn analyze(&self, buffer: &PcmBuffer) -> Result<SpectrumGrid> {
        SpectrumAnalyzer::new(self.config.analyzer.clone())?.analyze(buffer)
    }

    /// Spectrum grid sized for a canvas `width` pixels wide.
    pub fn analyze_for_width(&self, buffer: &PcmBuffer, width: usize) -> Result<SpectrumGrid> {
        debug!(width, "analyzing for canvas");
        SpectrumAnalyzer::for_canvas_width(self.config.analyzer.clone(), width)?.analyze(buffer)
    }
}

fn ensure_audio(buffer: &PcmBuffer) -> Result<()> {
    if buffer.is_empty() {
        return Err(VoiceShiftError::InvalidInput(
            "cannot process an empty buffer".into(),
        ));
    }
    Ok(())
}

/// [`Processor::process_preset`] with the default configuration.
pub fn process_preset(buffer: &PcmBuffer, preset: Preset) -> Result<PresetOutput> {
    Processor::default().process_preset(buffer, preset)
}

/// [`Processor::process_advanced`] with the default configuration.
pub fn process_advanced(buffer: &PcmBuffer, params: &AdvancedParams) -> Result<PcmBuffer> {
    Processor::default().process_advanced(buffer, params)
}

/// [`Processor::analyze`] with the default configuration.
pub fn analyze(buffer: &PcmBuffer) -> Result<SpectrumGrid> {
    Processor::default().analyze(buffer)
}
