use std::mem;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::audio::SignalLevels;
use crate::models::config::{CaptureSettings, ScanConfiguration};
use crate::models::error::ScanError;
use crate::models::payload::AudioPayload;
use crate::models::report::ForensicReport;
use crate::models::state::ScanState;
use crate::processing::wav;
use crate::processing::waveform::WaveformWindow;
use crate::traits::capture_provider::CaptureProvider;
use crate::traits::classifier::Classifier;
use crate::traits::scan_delegate::ScanDelegate;

/// Minimum spacing between delegate level notifications.
const LEVELS_NOTIFY_INTERVAL: Duration = Duration::from_millis(100);

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// The one piece of process-wide mutable state: captured samples, the
/// visualization window, and the current phase. Mutated only through
/// `ScanSession` and its capture callback.
struct SessionInner {
    state: ScanState,
    samples: Vec<f32>,
    waveform: WaveformWindow,
    levels: SignalLevels,
    capture_start: Option<Instant>,
    last_levels_notify: Option<Instant>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: ScanState::Idle,
            samples: Vec::new(),
            waveform: WaveformWindow::default(),
            levels: SignalLevels::default(),
            capture_start: None,
            last_levels_notify: None,
        }
    }

    fn clear_capture(&mut self) {
        self.samples = Vec::new();
        self.waveform.reset();
        self.levels = SignalLevels::default();
        self.capture_start = None;
        self.last_levels_notify = None;
    }
}

/// Orchestrates one scan session at a time: capture (or import), a single
/// classification call, and the terminal report/error.
///
/// Generic over the microphone backend via `CaptureProvider` and over the
/// remote engine via `Classifier`, so the whole flow runs against mocks
/// in tests. Data flow:
/// ```text
/// [Mic Provider] → mono/resampled samples ─┬→ [WaveformWindow] (display)
///                                          └→ [WAV encode] → [Classifier]
/// ```
pub struct ScanSession {
    mic: Box<dyn CaptureProvider>,
    classifier: Arc<dyn Classifier>,
    config: ScanConfiguration,
    settings: CaptureSettings,
    inner: Arc<Mutex<SessionInner>>,
    delegate: Option<Arc<dyn ScanDelegate>>,
}

impl ScanSession {
    pub fn new(
        mic: Box<dyn CaptureProvider>,
        classifier: Arc<dyn Classifier>,
        config: ScanConfiguration,
        settings: CaptureSettings,
    ) -> Result<Self, ScanError> {
        settings.validate().map_err(ScanError::CaptureFailed)?;
        Ok(Self {
            mic,
            classifier,
            config,
            settings,
            inner: Arc::new(Mutex::new(SessionInner::new())),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ScanDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// The device backing live capture.
    pub fn device(&self) -> crate::models::audio::AudioSource {
        self.mic.device_info()
    }

    /// Current session state, with a live capture duration when capturing.
    pub fn state(&self) -> ScanState {
        let inner = self.inner.lock();
        match &inner.state {
            ScanState::Capturing { .. } => ScanState::Capturing {
                duration_secs: inner
                    .capture_start
                    .map(|s| s.elapsed().as_secs_f64())
                    .unwrap_or(0.0),
            },
            other => other.clone(),
        }
    }

    /// Current input levels (display-only).
    pub fn levels(&self) -> SignalLevels {
        self.inner.lock().levels
    }

    /// Snapshot of the rolling amplitude window (display-only).
    pub fn waveform(&self) -> Vec<f32> {
        self.inner.lock().waveform.bins().to_vec()
    }

    /// Begin a live capture session. Transitions: idle → capturing.
    ///
    /// A failed microphone start releases the device, logs the cause, and
    /// returns the session to idle; the error is reported to the caller
    /// and delegate but no result view is produced for it.
    pub fn start_live_scan(&mut self) -> Result<(), ScanError> {
        {
            let inner = self.inner.lock();
            if !inner.state.is_idle() {
                return Err(ScanError::SessionBusy("a scan is already in progress"));
            }
        }

        if !self.mic.is_available() {
            log::warn!("live scan requested but no capture device is available");
            return Err(ScanError::DeviceUnavailable);
        }

        {
            let mut inner = self.inner.lock();
            inner.clear_capture();
            inner.capture_start = Some(Instant::now());
        }
        self.set_state(ScanState::Capturing { duration_secs: 0.0 });

        let callback = self.capture_callback();
        if let Err(e) = self.mic.start(callback) {
            // Release the device on the failure path too, then abort the
            // session back to idle.
            let _ = self.mic.stop();
            log::warn!("capture start failed: {}", e);
            self.inner.lock().clear_capture();
            self.set_state(ScanState::Idle);
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(&e);
            }
            return Err(e);
        }

        log::info!("live capture started on {}", self.mic.device_info().name);
        Ok(())
    }

    /// Conclude the live capture and classify the encoded payload.
    /// Transitions: capturing → classifying → resulted / failed.
    pub fn stop_and_classify(&mut self) -> Result<ForensicReport, ScanError> {
        {
            let inner = self.inner.lock();
            if !inner.state.is_capturing() {
                return Err(ScanError::SessionBusy("no live capture to conclude"));
            }
        }

        if let Err(e) = self.mic.stop() {
            log::warn!("microphone stop reported: {}", e);
        }

        let (samples, duration) = {
            let mut inner = self.inner.lock();
            let duration = inner
                .capture_start
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or(0.0);
            (mem::take(&mut inner.samples), duration)
        };

        log::info!(
            "capture concluded: {:.1}s, {} samples at {} Hz",
            duration,
            samples.len(),
            self.settings.sample_rate
        );

        let wav_bytes = wav::encode_wav_mono(&samples, self.settings.sample_rate);
        let payload = match AudioPayload::new(wav_bytes, "audio/wav") {
            Ok(payload) => payload,
            Err(e) => {
                // Capture-layer problem: handled locally, back to idle.
                log::warn!("captured audio unusable: {}", e);
                self.inner.lock().clear_capture();
                self.set_state(ScanState::Idle);
                return Err(e);
            }
        };

        self.classify_payload(payload)
    }

    /// Abort a live capture, releasing the microphone and discarding any
    /// partial payload. Transitions: capturing → idle. Ignored elsewhere.
    pub fn cancel(&mut self) {
        let capturing = self.inner.lock().state.is_capturing();
        if !capturing {
            log::debug!("cancel ignored outside capture");
            return;
        }
        let _ = self.mic.stop();
        self.inner.lock().clear_capture();
        self.set_state(ScanState::Idle);
        log::info!("capture cancelled, session back to idle");
    }

    /// Classify a user-supplied file. Transitions: idle → classifying,
    /// bypassing capture.
    pub fn submit_file(&mut self, path: &std::path::Path) -> Result<ForensicReport, ScanError> {
        self.ensure_idle_for_submit()?;
        let payload = AudioPayload::from_file(path)?;
        self.classify_payload(payload)
    }

    /// Classify an already-built payload. Transitions: idle → classifying.
    pub fn submit_payload(&mut self, payload: AudioPayload) -> Result<ForensicReport, ScanError> {
        self.ensure_idle_for_submit()?;
        self.classify_payload(payload)
    }

    /// Discard any report, error, or partial payload and return to idle.
    /// Idempotent from idle; from capturing behaves as a cancel so the
    /// microphone can never leak across a reset.
    pub fn reset(&mut self) {
        if self.inner.lock().state.is_capturing() {
            let _ = self.mic.stop();
        }
        {
            let mut inner = self.inner.lock();
            inner.clear_capture();
            if inner.state.is_idle() {
                return; // no transition, no notification
            }
        }
        self.set_state(ScanState::Idle);
    }

    // --- Internal helpers ---

    fn ensure_idle_for_submit(&self) -> Result<(), ScanError> {
        let inner = self.inner.lock();
        if inner.state.is_idle() {
            Ok(())
        } else {
            Err(ScanError::SessionBusy("a scan is already in progress"))
        }
    }

    /// Exactly one classification call per session; the payload is
    /// consumed here and nothing of it survives a failure.
    fn classify_payload(&mut self, payload: AudioPayload) -> Result<ForensicReport, ScanError> {
        self.set_state(ScanState::Classifying);

        match self.classifier.classify(&payload, &self.config) {
            Ok(report) => {
                self.set_state(ScanState::Resulted(Box::new(report.clone())));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_report_ready(&report);
                }
                Ok(report)
            }
            Err(e) => {
                self.set_state(ScanState::Failed(e.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&e);
                }
                Err(e)
            }
        }
    }

    fn set_state(&self, new_state: ScanState) {
        {
            let mut inner = self.inner.lock();
            log::debug!("session state: {} → {}", inner.state.name(), new_state.name());
            inner.state = new_state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    /// Build the audio-thread callback: downmix, resample, accumulate,
    /// and feed the display window. Late buffers arriving after the
    /// session leaves capturing are dropped.
    fn capture_callback(&self) -> crate::traits::capture_provider::AudioBufferCallback {
        let inner = Arc::clone(&self.inner);
        let delegate = self.delegate.clone();
        let target_rate = self.settings.sample_rate as f64;

        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            let mono = wav::downmix_to_mono(samples, channels as usize);
            let resampled = wav::resample_mono(&mono, sample_rate, target_rate);

            let notify = {
                let mut guard = inner.lock();
                if !guard.state.is_capturing() {
                    return;
                }
                guard.samples.extend_from_slice(&resampled);
                guard.waveform.push_buffer(&resampled);
                guard.levels = SignalLevels {
                    rms: wav::rms_level(&resampled),
                    peak: wav::peak_level(&resampled),
                };

                let due = guard
                    .last_levels_notify
                    .map(|t| t.elapsed() >= LEVELS_NOTIFY_INTERVAL)
                    .unwrap_or(true);
                if due {
                    guard.last_levels_notify = Some(Instant::now());
                    Some(guard.levels)
                } else {
                    None
                }
            };

            if let (Some(levels), Some(delegate)) = (notify, delegate.as_ref()) {
                delegate.on_levels_updated(&levels);
            }
        })
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // Component teardown must release the microphone too.
        let _ = self.mic.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::audio::AudioSource;
    use crate::models::config::{Language, ScanMode};
    use crate::models::report::{
        AcousticScores, Prediction, ReportMetadata, TechnicalFeatures,
    };
    use crate::traits::capture_provider::AudioBufferCallback;

    /// Scripted microphone: start feeds a fixed buffer synchronously,
    /// stop counts invocations so tests can observe resource release.
    struct MockMic {
        available: bool,
        start_error: Option<ScanError>,
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        feed: Vec<f32>,
    }

    impl MockMic {
        fn working() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let starts = Arc::new(AtomicUsize::new(0));
            let stops = Arc::new(AtomicUsize::new(0));
            let mic = Self {
                available: true,
                start_error: None,
                starts: Arc::clone(&starts),
                stops: Arc::clone(&stops),
                feed: vec![0.1f32; 1600],
            };
            (mic, starts, stops)
        }

        fn denied() -> (Self, Arc<AtomicUsize>) {
            let stops = Arc::new(AtomicUsize::new(0));
            let mic = Self {
                available: true,
                start_error: Some(ScanError::PermissionDenied),
                starts: Arc::new(AtomicUsize::new(0)),
                stops: Arc::clone(&stops),
                feed: Vec::new(),
            };
            (mic, stops)
        }
    }

    impl CaptureProvider for MockMic {
        fn is_available(&self) -> bool {
            self.available
        }

        fn start(&mut self, callback: AudioBufferCallback) -> Result<(), ScanError> {
            if let Some(e) = self.start_error.clone() {
                return Err(e);
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            callback(&self.feed, 16000.0, 1);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), ScanError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn device_info(&self) -> AudioSource {
            AudioSource {
                id: "mock".into(),
                name: "Mock Microphone".into(),
                is_default: true,
            }
        }
    }

    struct MockClassifier {
        outcome: Result<ForensicReport, ScanError>,
        seen: Mutex<Option<(usize, String)>>,
    }

    impl MockClassifier {
        fn succeeding(report: ForensicReport) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(report),
                seen: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(ScanError::ClassificationFailed),
                seen: Mutex::new(None),
            })
        }
    }

    impl Classifier for MockClassifier {
        fn classify(
            &self,
            payload: &AudioPayload,
            _config: &ScanConfiguration,
        ) -> Result<ForensicReport, ScanError> {
            *self.seen.lock() = Some((payload.len(), payload.mime_type().to_string()));
            self.outcome.clone()
        }
    }

    fn report_fixture(prediction: Prediction, confidence: f64) -> ForensicReport {
        ForensicReport {
            language: "HINDI".into(),
            prediction,
            confidence,
            explanation: "fixture".into(),
            transcription: None,
            native_transcript: None,
            technical_features: TechnicalFeatures::default(),
            phonetic_markers: vec![],
            scores: AcousticScores {
                spectral_integrity: 40,
                prosodic_naturalness: 55,
                phonetic_authenticity: 62,
            },
            metadata: ReportMetadata {
                detected_language: "HINDI".into(),
                scan_mode: "DEEP".into(),
                timestamp: "2026-01-01T00:00:00Z".into(),
                session_id: "VX-TEST00".into(),
                latency: "1.83s".into(),
            },
        }
    }

    fn session(
        mic: MockMic,
        classifier: Arc<MockClassifier>,
    ) -> ScanSession {
        ScanSession::new(
            Box::new(mic),
            classifier,
            ScanConfiguration {
                language: Language::Hindi,
                mode: ScanMode::Deep,
            },
            CaptureSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn start_enters_capturing() {
        let (mic, starts, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();

        assert!(s.state().is_capturing());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert!(s.waveform().iter().any(|&b| b > 0.0));
        assert!(s.levels().peak > 0.0);
    }

    #[test]
    fn reentrant_start_rejected_not_queued() {
        let (mic, starts, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        let err = s.start_live_scan().unwrap_err();

        assert!(matches!(err, ScanError::SessionBusy(_)));
        assert!(s.state().is_capturing());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_releases_mic_and_returns_idle() {
        let (mic, _, stops) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        s.cancel();

        assert!(s.state().is_idle());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(s.waveform().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn denied_permission_aborts_to_idle_with_release() {
        let (mic, stops) = MockMic::denied();
        let mut s = session(mic, MockClassifier::failing());

        let err = s.start_live_scan().unwrap_err();

        assert_eq!(err, ScanError::PermissionDenied);
        assert!(s.state().is_idle());
        assert!(stops.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn stop_and_classify_success_reaches_resulted() {
        let (mic, _, stops) = MockMic::working();
        let classifier = MockClassifier::succeeding(report_fixture(Prediction::Human, 0.93));
        let mut s = session(mic, Arc::clone(&classifier));

        s.start_live_scan().unwrap();
        let report = s.stop_and_classify().unwrap();

        assert_eq!(report.prediction, Prediction::Human);
        assert!(matches!(s.state(), ScanState::Resulted(_)));
        assert_eq!(stops.load(Ordering::SeqCst), 1);

        // The classifier received an encoded WAV payload.
        let seen = classifier.seen.lock().clone().unwrap();
        assert_eq!(seen.1, "audio/wav");
        assert!(seen.0 > crate::processing::wav::WAV_HEADER_SIZE);
    }

    #[test]
    fn stop_and_classify_failure_reaches_failed() {
        let (mic, _, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        let err = s.stop_and_classify().unwrap_err();

        assert_eq!(err, ScanError::ClassificationFailed);
        assert!(matches!(s.state(), ScanState::Failed(_)));
    }

    #[test]
    fn stop_without_capture_rejected() {
        let (mic, _, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        assert!(matches!(
            s.stop_and_classify().unwrap_err(),
            ScanError::SessionBusy(_)
        ));
    }

    #[test]
    fn upload_bypasses_capturing() {
        let (mic, starts, _) = MockMic::working();
        let classifier =
            MockClassifier::succeeding(report_fixture(Prediction::AiGenerated, 0.87));
        let mut s = session(mic, classifier);

        let payload = AudioPayload::new(vec![0u8; 256], "audio/mpeg").unwrap();
        let report = s.submit_payload(payload).unwrap();

        assert_eq!(report.prediction, Prediction::AiGenerated);
        assert!(matches!(s.state(), ScanState::Resulted(_)));
        assert_eq!(starts.load(Ordering::SeqCst), 0); // mic never touched
    }

    #[test]
    fn submit_rejected_while_capturing() {
        let (mic, _, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        let payload = AudioPayload::new(vec![0u8; 256], "audio/mpeg").unwrap();

        assert!(matches!(
            s.submit_payload(payload).unwrap_err(),
            ScanError::SessionBusy(_)
        ));
    }

    #[test]
    fn reset_clears_terminal_state_and_is_idempotent() {
        let (mic, _, _) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        let _ = s.stop_and_classify();
        assert!(s.state().is_terminal());

        s.reset();
        assert!(s.state().is_idle());

        // Reset from idle twice: a no-op, no panic, still idle.
        s.reset();
        s.reset();
        assert!(s.state().is_idle());
    }

    #[test]
    fn reset_during_capture_releases_mic() {
        let (mic, _, stops) = MockMic::working();
        let mut s = session(mic, MockClassifier::failing());

        s.start_live_scan().unwrap();
        s.reset();

        assert!(s.state().is_idle());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn end_to_end_upload_displays_ai_verdict() {
        // HINDI + DEEP upload, mocked AI_GENERATED at 0.87 with
        // spectral integrity 40, shown as 87.00%.
        let (mic, _, _) = MockMic::working();
        let classifier =
            MockClassifier::succeeding(report_fixture(Prediction::AiGenerated, 0.87));
        let mut s = session(mic, classifier);

        let payload = AudioPayload::new(vec![1u8; 512], "audio/mpeg").unwrap();
        let report = s.submit_payload(payload).unwrap();
        let view = crate::present::presenter::present_report(&report);

        assert_eq!(view.classification, "AI_GENERATED");
        assert_eq!(view.confidence, "87.00%");
        assert_eq!(view.scorecard[0].score, 40);
    }
}
