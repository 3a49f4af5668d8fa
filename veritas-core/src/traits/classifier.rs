use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::payload::AudioPayload;
use crate::models::report::ForensicReport;

/// A remote authenticity judgment, treated as an opaque function.
///
/// One request/response call per invocation, no retry built in. The call
/// is idempotent from the caller's perspective: no partial state is
/// retained on failure, and the only recovery path is a new session.
///
/// Production implementation: `client::GeminiClassifier`. Tests use a
/// scripted mock.
pub trait Classifier: Send + Sync {
    fn classify(
        &self,
        payload: &AudioPayload,
        config: &ScanConfiguration,
    ) -> Result<ForensicReport, ScanError>;
}
