use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat};

use veritas_core::models::audio::AudioSource;
use veritas_core::models::error::ScanError;
use veritas_core::traits::capture_provider::{AudioBufferCallback, CaptureProvider};

/// How long to wait for the capture thread to open the device.
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval of the stream-owning thread while capture runs.
const IDLE_TICK: Duration = Duration::from_millis(50);

/// Microphone capture via cpal.
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated
/// capture thread for its whole lifetime: the thread opens the device,
/// plays the stream, parks until `stop`, and drops the stream on exit.
/// Dropping the stream is what releases the microphone, so every exit
/// path of the thread releases it.
pub struct CpalMicCapture {
    device_name: Option<String>,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CpalMicCapture {
    /// Capture from the system default input device.
    pub fn default_device() -> Self {
        Self {
            device_name: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Capture from a named input device.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    fn resolve_device(name: &Option<String>) -> Result<Device, ScanError> {
        let host = cpal::default_host();
        match name {
            None => host.default_input_device().ok_or(ScanError::DeviceUnavailable),
            Some(wanted) => {
                let devices = host
                    .input_devices()
                    .map_err(|e| ScanError::CaptureFailed(e.to_string()))?;
                for device in devices {
                    if device.name().map(|n| &n == wanted).unwrap_or(false) {
                        return Ok(device);
                    }
                }
                Err(ScanError::DeviceUnavailable)
            }
        }
    }
}

impl CaptureProvider for CpalMicCapture {
    fn is_available(&self) -> bool {
        Self::resolve_device(&self.device_name).is_ok()
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), ScanError> {
        if self.worker.is_some() {
            return Err(ScanError::CaptureFailed("capture already running".into()));
        }

        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let device_name = self.device_name.clone();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), ScanError>>();

        let handle = thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || {
                let stream = match open_stream(&device_name, callback) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while running.load(Ordering::SeqCst) {
                    thread::sleep(IDLE_TICK);
                }

                // The stream drops here, releasing the microphone.
                drop(stream);
            })
            .map_err(|e| ScanError::CaptureFailed(format!("capture thread spawn: {}", e)))?;

        self.worker = Some(handle);

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                let _ = self.stop();
                Err(e)
            }
            Err(_) => {
                let _ = self.stop();
                Err(ScanError::CaptureFailed("timed out opening capture device".into()))
            }
        }
    }

    fn stop(&mut self) -> Result<(), ScanError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("capture thread panicked");
            }
        }
        Ok(())
    }

    fn device_info(&self) -> AudioSource {
        match &self.device_name {
            Some(name) => AudioSource {
                id: name.clone(),
                name: name.clone(),
                is_default: false,
            },
            None => {
                let name = cpal::default_host()
                    .default_input_device()
                    .and_then(|d| d.name().ok())
                    .unwrap_or_else(|| "System Default Input".to_string());
                AudioSource {
                    id: "default".into(),
                    name,
                    is_default: true,
                }
            }
        }
    }
}

impl Drop for CpalMicCapture {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Open the input stream on the capture thread, delivering f32 buffers
/// to `callback` regardless of the device's native sample format.
fn open_stream(
    device_name: &Option<String>,
    callback: AudioBufferCallback,
) -> Result<cpal::Stream, ScanError> {
    if !super::permissions::check_microphone_permission() {
        return Err(ScanError::PermissionDenied);
    }

    let device = CpalMicCapture::resolve_device(device_name)?;
    let device_label = device.name().unwrap_or_else(|_| "unknown".to_string());

    let supported = device
        .default_input_config()
        .map_err(|e| ScanError::CaptureFailed(format!("input config: {}", e)))?;
    let sample_format = supported.sample_format();
    let sample_rate = supported.sample_rate().0 as f64;
    let channels = supported.channels();
    let config: cpal::StreamConfig = supported.into();

    log::info!(
        "opening {} at {} Hz, {} ch, {:?}",
        device_label,
        sample_rate,
        channels,
        sample_format
    );

    let err_fn = |e: cpal::StreamError| log::error!("capture stream error: {}", e);

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _| callback(data, sample_rate, channels),
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _| {
                let converted = i16_to_f32(data);
                callback(&converted, sample_rate, channels);
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            &config,
            move |data: &[u16], _| {
                let converted = u16_to_f32(data);
                callback(&converted, sample_rate, channels);
            },
            err_fn,
            None,
        ),
        other => {
            return Err(ScanError::CaptureFailed(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| match e {
        cpal::BuildStreamError::DeviceNotAvailable => ScanError::DeviceUnavailable,
        other => ScanError::CaptureFailed(other.to_string()),
    })?;

    stream
        .play()
        .map_err(|e| ScanError::CaptureFailed(format!("stream play: {}", e)))?;

    Ok(stream)
}

fn i16_to_f32(data: &[i16]) -> Vec<f32> {
    data.iter().map(|&v| v as f32 / i16::MAX as f32).collect()
}

fn u16_to_f32(data: &[u16]) -> Vec<f32> {
    data.iter()
        .map(|&v| (v as f32 - 32768.0) / 32768.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_conversion_range() {
        let out = i16_to_f32(&[0, i16::MAX, -i16::MAX]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], -1.0);
    }

    #[test]
    fn u16_conversion_centers_on_zero() {
        let out = u16_to_f32(&[32768, 0, 65535]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], -1.0);
        assert!((out[2] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn stop_without_start_is_safe() {
        let mut mic = CpalMicCapture::default_device();
        assert!(mic.stop().is_ok());
        assert!(mic.stop().is_ok());
    }
}
