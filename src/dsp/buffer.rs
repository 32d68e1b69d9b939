//! PCM buffer: the value type every node consumes and produces.

use crate::error::{Result, VoiceShiftError};

/// Multi-channel floating-point audio at a fixed sample rate.
///
/// All channels share one length and every sample is finite. Buffers are never mutated after
/// construction; every node returns a fresh buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(VoiceShiftError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        if channels.is_empty() {
            return Err(VoiceShiftError::InvalidInput(
                "buffer has no channels".into(),
            ));
        }
        let len = channels[0].len();
        if let Some(ch) = channels.iter().position(|c| c.len() != len) {
            return Err(VoiceShiftError::InvalidInput(format!(
                "channel {ch} has {} samples, expected {len}",
                channels[ch].len()
            )));
        }
        for (ch, samples) in channels.iter().enumerate() {
            if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
                return Err(VoiceShiftError::InvalidInput(format!(
                    "channel {ch} sample {i} is not finite ({})",
                    samples[i]
                )));
            }
        }
        Ok(PcmBuffer {
            sample_rate,
            channels,
        })
    }

    /// Single-channel buffer.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Build from interleaved frames (`L R L R ...`).
    pub fn from_interleaved(sample_rate: u32, num_channels: usize, data: &[f32]) -> Result<Self> {
        if num_channels == 0 {
            return Err(VoiceShiftError::InvalidInput(
                "buffer has no channels".into(),
            ));
        }
        if data.len() % num_channels != 0 {
            return Err(VoiceShiftError::InvalidInput(format!(
                "{} interleaved samples do not divide into {num_channels} channels",
                data.len()
            )));
        }
        let frames = data.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in data.chunks_exact(num_channels) {
            for (ch, &s) in frame.iter().enumerate() {
                channels[ch].push(s);
            }
        }
        Self::new(sample_rate, channels)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Sample frames per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Apply `f` to every channel, producing a buffer at the same rate.
    ///
    /// `f` may change the channel length but must do so uniformly.
    pub fn map_channels<F>(&self, mut f: F) -> Result<PcmBuffer>
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        let channels = self.channels.iter().map(|c| f(c.as_slice())).collect();
        PcmBuffer::new(self.sample_rate, channels)
    }

    /// Read channel `ch` at a fractional position with linear interpolation.
    ///
    /// Positions before the start or beyond the final sample read as silence.
    pub fn read_interpolated(&self, ch: usize, position: f64) -> f64 {
        let data = &self.channels[ch];
        if data.is_empty() || position < 0.0 {
            return 0.0;
        }

        let idx = position as usize;
        if idx >= data.len() - 1 {
            return if idx < data.len() {
                data[idx] as f64
            } else {
                0.0
            };
        }

        let frac = position - idx as f64;
        data[idx] as f64 * (1.0 - frac) + data[idx + 1] as f64 * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_channels() {
        let err = PcmBuffer::new(44100, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert!(matches!(err, VoiceShiftError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_rate_and_no_channels() {
        assert!(PcmBuffer::new(0, vec![vec![0.0]]).is_err());
        assert!(PcmBuffer::new(44100, vec![]).is_err());
    }

    #[test]
    fn rejects_non_finite_samples() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut right = vec![0.0; 8];
            right[2] = bad;
            let err = PcmBuffer::new(16000, vec![vec![0.0; 8], right]).unwrap_err();
            assert!(matches!(err, VoiceShiftError::InvalidInput(_)), "{bad} accepted");
        }
        assert!(PcmBuffer::from_interleaved(16000, 1, &[0.0, f32::NAN]).is_err());
    }

    #[test]
    fn deinterleaves_frames() {
        let b = PcmBuffer::from_interleaved(8000, 2, &[0.1, -0.1, 0.2, -0.2]).unwrap();
        assert_eq!(b.num_channels(), 2);
        assert_eq!(b.channel(0).unwrap(), &[0.1, 0.2]);
        assert_eq!(b.channel(1).unwrap(), &[-0.1, -0.2]);
    }

    #[test]
    fn duration_matches_length() {
        let b = PcmBuffer::mono(16000, vec![0.0; 8000]).unwrap();
        assert!((b.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interpolates_between_samples() {
        let b = PcmBuffer::mono(8000, vec![0.0, 1.0, 0.0]).unwrap();
        assert!((b.read_interpolated(0, 0.5) - 0.5).abs() < 1e-9);
        assert!((b.read_interpolated(0, 1.25) - 0.75).abs() < 1e-9);
        assert_eq!(b.read_interpolated(0, 2.0), 0.0);
        assert_eq!(b.read_interpolated(0, 7.0), 0.0);
        assert_eq!(b.read_interpolated(0, -1.0), 0.0);
    }
}
