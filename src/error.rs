use thiserror::Error;

/// Errors produced by the voice-shift core.
///
/// Every operation is a pure computation over its inputs, so a failure is
/// reported once and never retried internally.
#[derive(Debug, Error)]
pub enum VoiceShiftError {
    /// Missing, empty, or malformed buffer.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A node, preset, or analyzer parameter outside its accepted range.
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },

    /// The input container could not be decoded to PCM.
    #[error("Decode failure: {0}")]
    Decode(String),

    /// An engine configuration document could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl VoiceShiftError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: f64,
        reason: impl Into<String>,
    ) -> Self {
        VoiceShiftError::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }
}

impl From<hound::Error> for VoiceShiftError {
    fn from(e: hound::Error) -> Self {
        VoiceShiftError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VoiceShiftError>;
