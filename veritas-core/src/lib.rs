//! # veritas-core
//!
//! Platform-agnostic voice forensics core library.
//!
//! Records or imports an audio clip, sends it to the remote forensic
//! engine for an AI-generated vs. human verdict, and maps the result
//! into a presentable report. The entire forensic judgment lives on the
//! remote side; this crate supplies the session state machine, the
//! capture/upload pipeline, and presentation.
//!
//! Platform microphone backends implement the `CaptureProvider` trait
//! and plug into the generic `ScanSession` (see `veritas-capture` for
//! the cpal backend).
//!
//! ## Architecture
//!
//! ```text
//! veritas-core (this crate)
//! ├── traits/       ← CaptureProvider, Classifier, ScanDelegate
//! ├── models/       ← ScanError, ScanState, ScanConfiguration, AudioPayload, ForensicReport
//! ├── processing/   ← WAV encoding, resampling, waveform window
//! ├── session/      ← ScanSession (state machine + orchestrator)
//! ├── client/       ← GeminiClassifier (remote engine wire contract)
//! └── present/      ← pure report → display-model mapping
//! ```

pub mod client;
pub mod models;
pub mod present;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use client::GeminiClassifier;
pub use models::audio::{AudioSource, SignalLevels};
pub use models::config::{CaptureSettings, Language, ScanConfiguration, ScanMode};
pub use models::error::ScanError;
pub use models::payload::AudioPayload;
pub use models::report::{
    AcousticScores, ForensicReport, MarkerStatus, PhoneticMarker, Prediction, ReportMetadata,
    TechnicalFeatures,
};
pub use models::state::ScanState;
pub use present::{DisplayModel, ReportErrorView, ReportView};
pub use processing::waveform::WaveformWindow;
pub use session::ScanSession;
pub use traits::capture_provider::{AudioBufferCallback, CaptureProvider};
pub use traits::classifier::Classifier;
pub use traits::scan_delegate::ScanDelegate;
