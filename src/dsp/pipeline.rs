//! Render pipeline: runs an ordered list of node applications.
//!
//! Each stage consumes the full output buffer of the previous one. Rendering
//! is synchronous and deterministic: identical inputs give bit-identical
//! output. A [`RenderContext`] is built for one render and dropped after it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, RobotConfig};
use crate::error::Result;

use super::buffer::PcmBuffer;
use super::filter::{self, FilterSpec};
use super::resampler::{self, PitchSpec};
use super::ring_mod::{self, RobotSpec};

/// One node application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum Stage {
    Pitch(PitchSpec),
    Filter(FilterSpec),
    Robot(RobotSpec),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Pitch(_) => "pitch",
            Stage::Filter(f) => match f.kind {
                filter::FilterType::Highpass => "highpass",
                filter::FilterType::Lowpass => "lowpass",
            },
            Stage::Robot(_) => "robot",
        }
    }

    /// Check parameters that do not depend on the input buffer.
    pub fn validate(&self) -> Result<()> {
        match self {
            Stage::Pitch(spec) => spec.validate(),
            Stage::Filter(_) => Ok(()),
            Stage::Robot(spec) => spec.validate(),
        }
    }

    fn apply(&self, input: &PcmBuffer, ctx: &RenderContext<'_>) -> Result<PcmBuffer> {
        match self {
            Stage::Pitch(spec) => resampler::apply(input, spec),
            Stage::Filter(spec) => filter::apply(input, spec, ctx.filter_q),
            Stage::Robot(spec) => ring_mod::apply(input, spec, ctx.robot),
        }
    }
}

/// Per-render parameters shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub filter_q: f64,
    pub robot: &'a RobotConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        RenderContext {
            filter_q: config.filter_q,
            robot: &config.robot,
        }
    }
}

/// An ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline { stages: Vec::new() }
    }

    pub fn single(stage: Stage) -> Self {
        Pipeline {
            stages: vec![stage],
        }
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order and return the final buffer.
    ///
    /// Parameters are validated before any stage runs, so a bad stage never
    /// leaves a half-rendered result behind. An empty pipeline returns a copy
    /// of the input.
    pub fn render(&self, input: &PcmBuffer, ctx: &RenderContext<'_>) -> Result<PcmBuffer> {
        for stage in &self.stages {
            stage.validate()?;
        }

        let mut current = input.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            current = stage.apply(&current, ctx)?;
            debug!(
                stage = i,
                node = stage.name(),
                channels = current.num_channels(),
                len = current.len(),
                "rendered stage"
            );
        }
        Ok(current)
    }
}
