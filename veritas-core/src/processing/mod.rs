pub mod wav;
pub mod waveform;
