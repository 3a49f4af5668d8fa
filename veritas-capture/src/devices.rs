//! Input device enumeration.

use cpal::traits::{DeviceTrait, HostTrait};

use veritas_core::models::audio::AudioSource;
use veritas_core::models::error::ScanError;

/// List the input devices currently available for live capture.
pub fn list_input_devices() -> Result<Vec<AudioSource>, ScanError> {
    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| d.name().ok());

    let devices = host
        .input_devices()
        .map_err(|e| ScanError::CaptureFailed(e.to_string()))?;

    let mut sources = Vec::new();
    for device in devices {
        let Ok(name) = device.name() else {
            continue;
        };
        let is_default = default_name.as_deref() == Some(name.as_str());
        sources.push(AudioSource {
            id: name.clone(),
            name,
            is_default,
        });
    }
    Ok(sources)
}
