use crate::models::audio::SignalLevels;
use crate::models::error::ScanError;
use crate::models::report::ForensicReport;
use crate::models::state::ScanState;

/// Event delegate for scan session notifications.
///
/// Methods may be called from the capture thread, not the UI thread.
/// Implementations should marshal to the UI thread if needed.
pub trait ScanDelegate: Send + Sync {
    /// Called whenever the session transitions state.
    fn on_state_changed(&self, state: &ScanState);

    /// Called periodically with updated input levels while capturing.
    fn on_levels_updated(&self, levels: &SignalLevels);

    /// Called when a session-level error occurs.
    fn on_error(&self, error: &ScanError);

    /// Called when a classification completes successfully.
    fn on_report_ready(&self, report: &ForensicReport);
}
