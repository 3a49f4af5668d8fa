use std::sync::Arc;

use crate::models::audio::AudioSource;
use crate::models::error::ScanError;

/// Callback invoked when an audio buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of channels (1 = mono, 2 = stereo interleaved).
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Interface for platform-specific microphone capture backends.
///
/// Implemented by `veritas-capture::CpalMicCapture`; tests substitute a
/// scripted mock. The session controller treats the microphone as an
/// exclusively-held resource: `stop` must release it on every exit path
/// and must be safe to call when capture never started.
pub trait CaptureProvider: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing audio, delivering buffers via `callback`.
    ///
    /// The callback fires on a dedicated audio thread; keep processing
    /// minimal. A denied microphone maps to `ScanError::PermissionDenied`.
    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), ScanError>;

    /// Stop capturing and release the microphone unconditionally.
    fn stop(&mut self) -> Result<(), ScanError>;

    /// Information about the device backing this provider.
    fn device_info(&self) -> AudioSource;
}
