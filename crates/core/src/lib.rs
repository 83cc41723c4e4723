pub mod config;
pub mod input;
pub mod output;
pub mod status;
pub mod synth;
pub mod text;
pub mod tts;

pub use synth::{SynthesisError, SynthesisJob, Synthesizer};
