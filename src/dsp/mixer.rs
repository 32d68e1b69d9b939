//! Mixer: sums weighted sources into one channel with hard clipping.

/// A summing mixer that accumulates audio from multiple sources.
#[derive(Debug, Clone)]
pub struct Mixer {
    buffer: Vec<f64>,
}

impl Mixer {
    /// Prepare a buffer of `num_samples` filled with zeros.
    pub fn new(num_samples: usize) -> Self {
        Mixer {
            buffer: vec![0.0; num_samples],
        }
    }

    /// Add a sample at the given index.
    pub fn add(&mut self, index: usize, sample: f64) {
        if index < self.buffer.len() {
            self.buffer[index] += sample;
        }
    }

    /// Add a whole source scaled by `gain`, starting at index 0.
    pub fn add_scaled(&mut self, source: &[f32], gain: f64) {
        for (i, &s) in source.iter().enumerate() {
            self.add(i, s as f64 * gain);
        }
    }

    /// Get the mixed output, clipped to [-1, 1].
    pub fn output(&self) -> Vec<f32> {
        self.buffer.iter().map(|&s| hard_clip(s) as f32).collect()
    }
}

fn hard_clip(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}
