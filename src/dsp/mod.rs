//! DSP: offline voice effects and spectrum analysis.
//!
//! Everything operates on complete, already-captured [`PcmBuffer`]s and
//! returns a new buffer; nothing streams and no engine state outlives a call.

pub mod buffer;
pub mod filter;
pub mod mixer;
pub mod oscillator;
pub mod pipeline;
pub mod resampler;
pub mod ring_mod;
pub mod spectrum;
pub mod wav;

pub use buffer::PcmBuffer;
