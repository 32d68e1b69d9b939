//! Spectrum analyzer: time × log-frequency intensity grid.
//!
//! Channel 0 is split into `C` equal segments. For each segment a Hann
//! window of `F` samples starting at the segment start is transformed, the
//! magnitudes are sampled at `rows` log-spaced frequencies between
//! `min_freq_hz` and Nyquist, converted to dB, and mapped from
//! `[floor_db, 0]` onto `[0, 1]`.

use std::f64::consts::PI;

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::AnalyzerConfig;
use crate::error::{Result, VoiceShiftError};

use super::buffer::PcmBuffer;

/// Intensity grid, column-major: `cells[col * rows + row]`.
///
/// Row 0 is the lowest frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumGrid {
    pub columns: usize,
    pub rows: usize,
    pub sample_rate: u32,
    pub min_freq_hz: f64,
    pub cells: Vec<f32>,
}

impl SpectrumGrid {
    pub fn column(&self, col: usize) -> &[f32] {
        &self.cells[col * self.rows..(col + 1) * self.rows]
    }

    /// Display frequency of `row` in Hz.
    pub fn row_frequency(&self, row: usize) -> f64 {
        log_row_frequency(row, self.rows, self.min_freq_hz, self.sample_rate as f64 / 2.0)
    }
}

/// Frequency of a log-spaced display row between `min_freq` and `nyquist`.
pub fn log_row_frequency(row: usize, rows: usize, min_freq: f64, nyquist: f64) -> f64 {
    let log_min = min_freq.log10();
    let log_max = nyquist.log10();
    10f64.powf(log_min + (row as f64 / rows as f64) * (log_max - log_min))
}

/// Hann window: `0.5 * (1 - cos(2πi / (n - 1)))`.
pub fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| (0.5 * (1.0 - (2.0 * PI * i as f64 / (size - 1) as f64).cos())) as f32)
        .collect()
}

/// Map a linear magnitude to [0, 1] over `[floor_db, 0]` dB.
///
/// A NaN magnitude maps to 0.
pub fn normalize_db(magnitude: f32, floor_db: f64) -> f32 {
    let db = 20.0 * (magnitude as f64 + 1e-10).log10();
    if db.is_nan() {
        return 0.0;
    }
    ((db - floor_db) / -floor_db).clamp(0.0, 1.0) as f32
}

/// One-shot analyzer. Build one per analysis; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    columns: usize,
}

impl SpectrumAnalyzer {
    /// Analyzer emitting `config.max_columns` columns.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let columns = config.max_columns;
        Ok(SpectrumAnalyzer { config, columns })
    }

    /// Analyzer for a canvas `width` pixels wide: `min(width, max_columns)` columns.
    pub fn for_canvas_width(config: AnalyzerConfig, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(VoiceShiftError::invalid_parameter(
                "canvas_width",
                0.0,
                "must be at least 1",
            ));
        }
        let mut analyzer = Self::new(config)?;
        analyzer.columns = width.min(analyzer.config.max_columns);
        Ok(analyzer)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn analyze(&self, buffer: &PcmBuffer) -> Result<SpectrumGrid> {
        if buffer.is_empty() {
            return Err(VoiceShiftError::InvalidInput(
                "cannot analyze an empty buffer".into(),
            ));
        }
        let AnalyzerConfig {
            fft_size,
            rows,
            min_freq_hz,
            floor_db,
            ..
        } = self.config;
        let nyquist = buffer.nyquist();
        if min_freq_hz >= nyquist {
            return Err(VoiceShiftError::invalid_parameter(
                "min_freq_hz",
                min_freq_hz,
                format!("must be below Nyquist ({nyquist} Hz)"),
            ));
        }

        let samples = buffer.channel(0).unwrap_or_default();
        let num_bins = fft_size / 2;
        let samples_per_column = samples.len() / self.columns;
        debug!(
            columns = self.columns,
            rows,
            fft_size,
            samples_per_column,
            sample_rate = buffer.sample_rate(),
            "analyzing spectrum"
        );

        // Linear bin for each display row; None when it lands past Nyquist.
        let row_bins: Vec<Option<usize>> = (0..rows)
            .map(|row| {
                let freq = log_row_frequency(row, rows, min_freq_hz, nyquist);
                let index = ((freq / nyquist) * num_bins as f64).floor();
                (index >= 0.0 && (index as usize) < num_bins).then_some(index as usize)
            })
            .collect();

        let window = hann_window(fft_size);
        let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);
        let mut frame = vec![Complex::new(0.0f32, 0.0); fft_size];
        let mut magnitudes = vec![0.0f32; num_bins];
        let mut cells = Vec::with_capacity(self.columns * rows);

        for col in 0..self.columns {
            let start = col * samples_per_column;
            for (i, slot) in frame.iter_mut().enumerate() {
                let s = samples.get(start + i).copied().unwrap_or(0.0);
                *slot = Complex::new(s * window[i], 0.0);
            }
            fft.process(&mut frame);

            for (mag, bin) in magnitudes.iter_mut().zip(&frame) {
                *mag = bin.norm();
            }
            trace!(col, start, "column transformed");

            cells.extend(row_bins.iter().map(|bin| match bin {
                Some(b) => normalize_db(magnitudes[*b], floor_db),
                None => 0.0,
            }));
        }

        Ok(SpectrumGrid {
            columns: self.columns,
            rows,
            sample_rate: buffer.sample_rate(),
            min_freq_hz,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, len: usize) -> PcmBuffer {
        let samples = (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect();
        PcmBuffer::mono(sample_rate, samples).unwrap()
    }

    fn analyzer() -> SpectrumAnalyzer {
        SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn grid_shape_is_fixed() {
        for len in [1, 50, 2048, 16000, 100_000] {
            let grid = analyzer().analyze(&sine(440.0, 16000, len)).unwrap();
            assert_eq!(grid.columns, 200, "len {len}");
            assert_eq!(grid.rows, 128);
            assert_eq!(grid.cells.len(), 200 * 128);
            assert!(grid.cells.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn canvas_width_caps_columns() {
        let narrow = SpectrumAnalyzer::for_canvas_width(AnalyzerConfig::default(), 150).unwrap();
        assert_eq!(narrow.columns(), 150);
        let wide = SpectrumAnalyzer::for_canvas_width(AnalyzerConfig::default(), 300).unwrap();
        assert_eq!(wide.columns(), 200);
        assert!(SpectrumAnalyzer::for_canvas_width(AnalyzerConfig::default(), 0).is_err());
    }

    #[test]
    fn row_frequencies_are_log_spaced() {
        let grid = analyzer().analyze(&sine(440.0, 16000, 16000)).unwrap();
        assert!((grid.row_frequency(0) - 20.0).abs() < 1e-9);
        let ratio = grid.row_frequency(1) / grid.row_frequency(0);
        for row in 1..127 {
            let r = grid.row_frequency(row + 1) / grid.row_frequency(row);
            assert!((r - ratio).abs() < 1e-9);
        }
        assert!(grid.row_frequency(127) < 8000.0);
    }

    #[test]
    fn sine_peaks_at_its_row() {
        let grid = analyzer().analyze(&sine(440.0, 16000, 16000)).unwrap();
        let col = grid.column(50);
        // 440 Hz lands on row 66 for 16 kHz audio.
        assert!((grid.row_frequency(66) - 440.0).abs() < 5.0);
        assert_eq!(col[66], 1.0);
        for row in 90..128 {
            assert!(col[row] < 0.05, "row {row} should be quiet, got {}", col[row]);
        }
    }

    #[test]
    fn silence_maps_to_zero() {
        let silent = PcmBuffer::mono(16000, vec![0.0; 16000]).unwrap();
        let grid = analyzer().analyze(&silent).unwrap();
        assert!(grid.cells.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn db_normalization_is_monotonic() {
        let mut last = 0.0f32;
        for exp in -12..=4 {
            let v = normalize_db(10f32.powi(exp), -60.0);
            assert!(v >= last, "magnitude 1e{exp} gave {v} < {last}");
            last = v;
        }
        assert_eq!(normalize_db(0.0, -60.0), 0.0);
        assert_eq!(normalize_db(1.0, -60.0), 1.0);
        assert!((normalize_db(0.001, -60.0) - 0.0).abs() < 1e-4);
        assert!((normalize_db(0.1, -60.0) - 2.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn nan_magnitude_maps_to_zero() {
        assert_eq!(normalize_db(f32::NAN, -60.0), 0.0);
        assert_eq!(normalize_db(f32::INFINITY, -60.0), 1.0);
    }

    #[test]
    fn uses_first_channel_only() {
        let tone = sine(440.0, 16000, 8000);
        let stereo = PcmBuffer::new(
            16000,
            vec![tone.channel(0).unwrap().to_vec(), vec![0.0; 8000]],
        )
        .unwrap();
        let a = analyzer().analyze(&stereo).unwrap();
        let b = analyzer().analyze(&tone).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hann_window_endpoints() {
        let w = hann_window(2048);
        assert_eq!(w[0], 0.0);
        assert!(w[2047].abs() < 1e-6);
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn rejects_empty_buffer() {
        let empty = PcmBuffer::mono(16000, vec![]).unwrap();
        assert!(matches!(
            analyzer().analyze(&empty),
            Err(VoiceShiftError::InvalidInput(_))
        ));
    }
}
