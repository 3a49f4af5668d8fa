//! Microphone access probe.
//!
//! There is no portable consent API: on most desktop platforms a denied
//! microphone shows up as a device that exists but refuses to hand out
//! an input configuration. Probing the default config is the closest
//! cross-platform signal cpal exposes.

use cpal::traits::{DeviceTrait, HostTrait};

/// Best-effort check that microphone access is currently possible.
///
/// Returns false when no input device exists or when the default device
/// refuses to report an input configuration (the usual symptom of a
/// privacy-settings denial).
pub fn check_microphone_permission() -> bool {
    let Some(device) = cpal::default_host().default_input_device() else {
        return false;
    };

    match device.default_input_config() {
        Ok(_) => true,
        Err(e) => {
            log::warn!("default input device rejected config probe: {}", e);
            false
        }
    }
}
