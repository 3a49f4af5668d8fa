//! # veritas-capture
//!
//! Cross-platform cpal microphone backend for veritas-core.
//!
//! Provides:
//! - `CpalMicCapture`: microphone capture on a dedicated stream thread
//! - `devices`: input device enumeration
//! - `permissions`: best-effort microphone access probe
//!
//! ## Usage
//! ```ignore
//! use veritas_capture::CpalMicCapture;
//! use veritas_core::{GeminiClassifier, ScanSession};
//!
//! let mic = CpalMicCapture::default_device();
//! let engine = GeminiClassifier::from_env()?;
//! let session = ScanSession::new(Box::new(mic), Arc::new(engine), config, settings)?;
//! ```

pub mod cpal_mic;
pub mod devices;
pub mod permissions;

pub use cpal_mic::CpalMicCapture;
pub use devices::list_input_devices;
