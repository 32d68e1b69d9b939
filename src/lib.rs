pub mod config;
pub mod dsp;
pub mod error;
pub mod preset;
pub mod process;

pub use crate::config::EngineConfig;
pub use crate::dsp::buffer::PcmBuffer;
pub use crate::dsp::spectrum::SpectrumGrid;
pub use crate::error::{Result, VoiceShiftError};
pub use crate::preset::{AdvancedParams, Preset};
pub use crate::process::{PresetOutput, Processor, analyze, process_advanced, process_preset};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the voiceshift-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js(e: VoiceShiftError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: decode a WAV clip, apply a named preset, return a WAV clip.
#[wasm_bindgen]
pub fn process_preset_wav(wav: &[u8], preset: &str) -> std::result::Result<Vec<u8>, JsValue> {
    let preset: Preset = preset.parse().map_err(to_js)?;
    let input = dsp::wav::decode_wav(wav).map_err(to_js)?;
    let output = process_preset(&input, preset).map_err(to_js)?;
    Ok(dsp::wav::encode_wav(&output.buffer))
}

/// WASM-exposed: decode a WAV clip, apply advanced-mode parameters
/// (`{ pitchShift, lowCutFreq, highCutFreq, robotEffect }`), return a WAV clip.
#[wasm_bindgen]
pub fn process_advanced_wav(wav: &[u8], params: JsValue) -> std::result::Result<Vec<u8>, JsValue> {
    let params: AdvancedParams = serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let input = dsp::wav::decode_wav(wav).map_err(to_js)?;
    let output = process_advanced(&input, &params).map_err(to_js)?;
    Ok(dsp::wav::encode_wav(&output))
}

/// WASM-exposed: decode a WAV clip and return its spectrum grid sized for a
/// canvas `canvas_width` pixels wide.
#[wasm_bindgen]
pub fn analyze_wav(wav: &[u8], canvas_width: u32) -> std::result::Result<JsValue, JsValue> {
    let input = dsp::wav::decode_wav(wav).map_err(to_js)?;
    let grid = Processor::default()
        .analyze_for_width(&input, canvas_width as usize)
        .map_err(to_js)?;
    serde_wasm_bindgen::to_value(&grid).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: display label for a preset wire name.
#[wasm_bindgen]
pub fn preset_label(preset: &str) -> std::result::Result<String, JsValue> {
    let preset: Preset = preset.parse().map_err(to_js)?;
    Ok(preset.label().to_string())
}
