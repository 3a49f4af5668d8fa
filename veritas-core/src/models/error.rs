use thiserror::Error;

/// Errors that can occur during a forensic scan session.
///
/// Classification failures are deliberately collapsed into a single
/// variant: the remote engine's transport, HTTP, and decode problems all
/// surface the same user-facing message. The underlying cause is logged
/// at the failure site, never propagated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The forensic engine credential is missing. Pre-flight fatal: no
    /// network call is ever attempted without it.
    #[error("forensic engine API key not found (set GEMINI_API_KEY)")]
    MissingCredentials,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no capture device available")]
    DeviceUnavailable,

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("invalid audio payload: {0}")]
    InvalidPayload(String),

    /// Normalized remote failure. Timeout, malformed response, and
    /// remote-side errors are indistinguishable to the caller.
    #[error("forensic node timeout: neural processing failed")]
    ClassificationFailed,

    /// An operation was requested from a state that does not permit it.
    /// Re-entrant starts are rejected, never queued.
    #[error("session busy: {0}")]
    SessionBusy(&'static str),
}
