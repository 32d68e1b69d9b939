//! End-to-end behaviour of the facade: presets, advanced mode, analysis, WAV.

use std::f64::consts::PI;

use voiceshift_core::dsp::wav::{decode_wav, encode_wav};
use voiceshift_core::{
    AdvancedParams, PcmBuffer, Preset, SpectrumGrid, VoiceShiftError, analyze, process_advanced,
    process_preset,
};

/// One second of a 440 Hz sine at 16 kHz, mono.
fn a440() -> PcmBuffer {
    let samples = (0..16000)
        .map(|i| (0.8 * (2.0 * PI * 440.0 * i as f64 / 16000.0).sin()) as f32)
        .collect();
    PcmBuffer::mono(16000, samples).unwrap()
}

/// Row whose display frequency is closest to `hz`.
fn row_near(grid: &SpectrumGrid, hz: f64) -> usize {
    (0..grid.rows)
        .min_by(|&a, &b| {
            let da = (grid.row_frequency(a) - hz).abs();
            let db = (grid.row_frequency(b) - hz).abs();
            da.total_cmp(&db)
        })
        .unwrap()
}

/// The row at `hz` is saturated and nothing in the column is louder.
fn assert_peak_at(grid: &SpectrumGrid, col: usize, hz: f64) {
    let column = grid.column(col);
    let row = row_near(grid, hz);
    let max = column.iter().copied().fold(0.0f32, f32::max);
    assert!(column[row] > 0.95, "column {col}: row {row} at {hz} Hz only {}", column[row]);
    assert_eq!(column[row], max, "column {col}: louder row than {hz} Hz");
}

#[test]
fn high_cut_keeps_440_and_silences_upper_rows() {
    let out = process_preset(&a440(), Preset::HighCut).unwrap();
    assert_eq!(out.buffer.len(), 16000);

    let grid = analyze(&out.buffer).unwrap();
    assert_eq!((grid.columns, grid.rows), (200, 128));

    // Columns whose 2048-sample window lies fully inside the clip.
    for col in 10..150 {
        assert_peak_at(&grid, col, 440.0);
        let column = grid.column(col);
        for row in 0..grid.rows {
            if grid.row_frequency(row) > 1300.0 {
                assert!(
                    column[row] < 0.05,
                    "column {col} row {row} ({} Hz) = {}",
                    grid.row_frequency(row),
                    column[row]
                );
            }
        }
    }
}

#[test]
fn female_preset_shortens_by_factor() {
    let out = process_preset(&a440(), Preset::Female).unwrap();
    assert_eq!(out.buffer.len(), (16000.0 / 1.3f64).floor() as usize);
    assert_eq!(out.buffer.sample_rate(), 16000);
}

#[test]
fn male_preset_lengthens_and_lowers_pitch() {
    let out = process_preset(&a440(), Preset::Male).unwrap();
    assert_eq!(out.buffer.len(), (16000.0 / 0.75f64).floor() as usize);

    // 440 * 0.75 = 330 Hz
    let grid = analyze(&out.buffer).unwrap();
    assert_peak_at(&grid, 100, 330.0);
}

#[test]
fn neutral_advanced_is_identity() {
    let params = AdvancedParams {
        pitch_shift: 0,
        low_cut_freq: 0.0,
        high_cut_freq: 8000.0,
        robot_effect: 0,
    };
    let input = a440();
    assert_eq!(process_advanced(&input, &params).unwrap(), input);
}

#[test]
fn advanced_octave_up_halves_length() {
    let params = AdvancedParams {
        pitch_shift: 50,
        ..AdvancedParams::default()
    };
    assert_eq!(process_advanced(&a440(), &params).unwrap().len(), 8000);
}

#[test]
fn grid_shape_independent_of_duration() {
    for len in [10usize, 400, 48_000] {
        let b = PcmBuffer::mono(16000, vec![0.25; len]).unwrap();
        let grid = analyze(&b).unwrap();
        assert_eq!(grid.cells.len(), 200 * 128, "len {len}");
    }
}

#[test]
fn original_and_processed_analyze_concurrently() {
    let original = a440();
    let processed = process_preset(&original, Preset::Robot).unwrap().buffer;

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| analyze(&original));
        let b = s.spawn(|| analyze(&processed));
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(a.unwrap(), analyze(&original).unwrap());
    assert_eq!(b.unwrap(), analyze(&processed).unwrap());
}

#[test]
fn processed_clip_survives_wav_round_trip() {
    let processed = process_preset(&a440(), Preset::LowCut).unwrap().buffer;
    let wav = encode_wav(&processed);
    assert_eq!(wav.len(), 44 + processed.len() * 2);

    let decoded = decode_wav(&wav).unwrap();
    assert_eq!(decoded.len(), processed.len());
    for (a, b) in processed.channel(0).unwrap().iter().zip(decoded.channel(0).unwrap()) {
        assert!((a - b).abs() <= 1.0 / 32767.0 + 1e-6, "{a} vs {b}");
    }
}

#[test]
fn failures_return_no_output() {
    let empty = PcmBuffer::mono(16000, vec![]).unwrap();
    assert!(matches!(
        analyze(&empty),
        Err(VoiceShiftError::InvalidInput(_))
    ));

    let bad = AdvancedParams {
        robot_effect: 150,
        ..AdvancedParams::default()
    };
    assert!(matches!(
        process_advanced(&a440(), &bad),
        Err(VoiceShiftError::InvalidParameter { name: "robot_effect", .. })
    ));
}
