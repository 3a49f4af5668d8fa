//! Pure mapping from a completed report (or error) to display-ready
//! fields. No I/O, deterministic for identical input. The one exception
//! is the cosmetic bar helper at the bottom, which is explicitly random
//! and display-only.

use rand::Rng;

use crate::models::error::ScanError;
use crate::models::report::{ForensicReport, MarkerStatus};

/// Shown when the engine recovered no usable speech.
const NO_SPEECH_FALLBACK: &str = "Static detected. No clear linguistic data recovered.";

/// One row of the acoustic scorecard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub label: &'static str,
    /// 0–100.
    pub score: u8,
}

/// One phonetic marker row, stringly-typed for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRow {
    pub marker: String,
    pub status: &'static str,
    pub detail: String,
}

/// Display-ready projection of a successful report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub is_ai: bool,
    /// Oversized hero label: `AI_GEN` or `HUMAN`.
    pub headline: &'static str,
    /// Full classification label: `AI_GENERATED` or `HUMAN_AUTHENTIC`.
    pub classification: &'static str,
    /// Percentage with two decimals, e.g. `87.00%`.
    pub confidence: String,
    pub latency: String,
    pub language: String,
    pub explanation: String,
    pub spectral: String,
    pub voice_quality: String,
    /// Recovered speech, with a fallback line when absent.
    pub transcription: String,
    pub native_transcript: Option<String>,
    pub scorecard: Vec<ScoreRow>,
    pub markers: Vec<MarkerRow>,
    pub session_id: String,
    pub scan_mode: String,
    pub timestamp: String,
}

/// Display-ready projection of a failed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportErrorView {
    pub title: &'static str,
    pub message: String,
}

/// What the result surface renders: exactly one of report or error.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayModel {
    Report(ReportView),
    Error(ReportErrorView),
}

/// Map a session outcome to its display model.
pub fn present(outcome: Result<&ForensicReport, &ScanError>) -> DisplayModel {
    match outcome {
        Ok(report) => DisplayModel::Report(present_report(report)),
        Err(error) => DisplayModel::Error(present_error(error)),
    }
}

pub fn present_report(report: &ForensicReport) -> ReportView {
    let is_ai = report.prediction.is_ai();
    ReportView {
        is_ai,
        headline: if is_ai { "AI_GEN" } else { "HUMAN" },
        classification: if is_ai { "AI_GENERATED" } else { "HUMAN_AUTHENTIC" },
        confidence: format!("{:.2}%", report.confidence * 100.0),
        latency: report.metadata.latency.clone(),
        language: report.metadata.detected_language.clone(),
        explanation: report.explanation.clone(),
        spectral: report.technical_features.spectral.clone(),
        voice_quality: report.technical_features.voice_quality.clone(),
        transcription: report
            .transcription
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_SPEECH_FALLBACK.to_string()),
        native_transcript: report.native_transcript.clone(),
        scorecard: vec![
            ScoreRow {
                label: "Spectral Continuity",
                score: report.scores.spectral_integrity,
            },
            ScoreRow {
                label: "Prosodic Fluidity",
                score: report.scores.prosodic_naturalness,
            },
            ScoreRow {
                label: "Phonetic Authenticity",
                score: report.scores.phonetic_authenticity,
            },
        ],
        markers: report
            .phonetic_markers
            .iter()
            .map(|m| MarkerRow {
                marker: m.marker.clone(),
                status: status_label(m.status),
                detail: m.detail.clone(),
            })
            .collect(),
        session_id: report.metadata.session_id.clone(),
        scan_mode: report.metadata.scan_mode.clone(),
        timestamp: report.metadata.timestamp.clone(),
    }
}

pub fn present_error(error: &ScanError) -> ReportErrorView {
    ReportErrorView {
        title: "SYSTEM_FAILURE",
        message: error.to_string(),
    }
}

/// Full report as formatted structured text, for the raw-telemetry view.
pub fn raw_telemetry(report: &ForensicReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

fn status_label(status: MarkerStatus) -> &'static str {
    match status {
        MarkerStatus::Pass => "PASS",
        MarkerStatus::Fail => "FAIL",
        MarkerStatus::Inconsistent => "INCONSISTENT",
    }
}

/// Cosmetic "acoustic consistency" bar heights (0–100), freshly random
/// on every call. Purely decorative; never assert on these.
pub fn consistency_bars(count: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..=100)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{
        AcousticScores, PhoneticMarker, Prediction, ReportMetadata, TechnicalFeatures,
    };

    fn report(prediction: Prediction, confidence: f64) -> ForensicReport {
        ForensicReport {
            language: "HINDI".into(),
            prediction,
            confidence,
            explanation: "Formant transitions too smooth.".into(),
            transcription: Some("test speech".into()),
            native_transcript: None,
            technical_features: TechnicalFeatures {
                spectral: "flat noise floor".into(),
                prosodic: "metronomic".into(),
                voice_quality: "no breath cues".into(),
            },
            phonetic_markers: vec![PhoneticMarker {
                marker: "retroflex stops".into(),
                status: MarkerStatus::Fail,
                detail: "over-articulated".into(),
            }],
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

    #[test]
    fn ai_verdict_labels() {
        let view = present_report(&report(Prediction::AiGenerated, 0.87));
        assert!(view.is_ai);
        assert_eq!(view.headline, "AI_GEN");
        assert_eq!(view.classification, "AI_GENERATED");
        assert_eq!(view.confidence, "87.00%");
    }

    #[test]
    fn human_verdict_labels() {
        let view = present_report(&report(Prediction::Human, 0.5));
        assert!(!view.is_ai);
        assert_eq!(view.headline, "HUMAN");
        assert_eq!(view.classification, "HUMAN_AUTHENTIC");
        assert_eq!(view.confidence, "50.00%");
    }

    #[test]
    fn presentation_is_deterministic() {
        let r = report(Prediction::AiGenerated, 0.87);
        assert_eq!(present_report(&r), present_report(&r));
    }

    #[test]
    fn scorecard_order_and_values() {
        let view = present_report(&report(Prediction::Human, 0.9));
        let labels: Vec<&str> = view.scorecard.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec!["Spectral Continuity", "Prosodic Fluidity", "Phonetic Authenticity"]
        );
        assert_eq!(view.scorecard[0].score, 40);
    }

    #[test]
    fn missing_transcription_uses_fallback() {
        let mut r = report(Prediction::Human, 0.9);
        r.transcription = None;
        let view = present_report(&r);
        assert_eq!(view.transcription, NO_SPEECH_FALLBACK);

        r.transcription = Some(String::new());
        assert_eq!(present_report(&r).transcription, NO_SPEECH_FALLBACK);
    }

    #[test]
    fn marker_rows_carry_status_labels() {
        let view = present_report(&report(Prediction::AiGenerated, 0.87));
        assert_eq!(view.markers[0].status, "FAIL");
    }

    #[test]
    fn error_view_carries_normalized_message() {
        let view = present_error(&ScanError::ClassificationFailed);
        assert_eq!(view.title, "SYSTEM_FAILURE");
        assert!(view.message.contains("forensic node timeout"));
    }

    #[test]
    fn present_picks_one_side() {
        let r = report(Prediction::Human, 0.9);
        assert!(matches!(present(Ok(&r)), DisplayModel::Report(_)));
        assert!(matches!(
            present(Err(&ScanError::ClassificationFailed)),
            DisplayModel::Error(_)
        ));
    }

    #[test]
    fn raw_telemetry_is_pretty_json() {
        let text = raw_telemetry(&report(Prediction::Human, 0.9));
        assert!(text.contains("\"sessionId\": \"VX-TEST00\""));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["metadata"]["latency"], "1.83s");
    }

    #[test]
    fn consistency_bars_shape_only() {
        // Display-only randomness: assert shape, never values.
        let bars = consistency_bars(12);
        assert_eq!(bars.len(), 12);
        assert!(bars.iter().all(|&b| b <= 100));
    }
}
