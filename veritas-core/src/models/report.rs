use serde::{Deserialize, Serialize};

/// Verdict on the audio's origin.
///
/// Decoded from the remote engine's free-form `prediction` string: the
/// `AiGenerated` variant is produced only on an exact `"AI_GENERATED"`
/// match; every other value coerces to `Human`. `Uncertain` exists for
/// schema completeness but is never produced by the decode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
    #[serde(rename = "UNCERTAIN")]
    Uncertain,
}

impl Prediction {
    /// Exact-match-only coercion of the raw wire string.
    pub fn from_wire(raw: &str) -> Self {
        if raw == "AI_GENERATED" {
            Prediction::AiGenerated
        } else {
            Prediction::Human
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Prediction::AiGenerated)
    }
}

/// One phonetic cue the engine checked for the selected language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticMarker {
    pub marker: String,
    pub status: MarkerStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerStatus {
    Pass,
    Fail,
    /// Also absorbs any unrecognized status string from the wire.
    #[serde(other)]
    Inconsistent,
}

/// Narrative signal observations returned by the engine.
///
/// `prosodic` is requested and decoded but not rendered anywhere; it is
/// kept for schema completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalFeatures {
    pub spectral: String,
    pub prosodic: String,
    pub voice_quality: String,
}

/// Numeric sub-scores, each on a 0–100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcousticScores {
    pub spectral_integrity: u8,
    pub prosodic_naturalness: u8,
    pub phonetic_authenticity: u8,
}

/// Audit trail attached to every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub detected_language: String,
    pub scan_mode: String,
    /// RFC 3339 wall-clock time the report was assembled.
    pub timestamp: String,
    pub session_id: String,
    /// Round-trip duration of the classification call, e.g. `"1.83s"`.
    pub latency: String,
}

/// The complete decoded classification result.
///
/// Created exactly once per successful classification, immutable
/// thereafter, and discarded when a new session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForensicReport {
    pub language: String,
    pub prediction: Prediction,
    /// Engine confidence in `[0, 1]`.
    pub confidence: f64,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_transcript: Option<String>,
    pub technical_features: TechnicalFeatures,
    pub phonetic_markers: Vec<PhoneticMarker>,
    pub scores: AcousticScores,
    pub metadata: ReportMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_wire_string_is_ai() {
        assert_eq!(Prediction::from_wire("AI_GENERATED"), Prediction::AiGenerated);
        assert_eq!(Prediction::from_wire("ai_generated"), Prediction::Human);
        assert_eq!(Prediction::from_wire("AI_GENERATED "), Prediction::Human);
        assert_eq!(Prediction::from_wire("UNCERTAIN"), Prediction::Human);
        assert_eq!(Prediction::from_wire(""), Prediction::Human);
    }

    #[test]
    fn unknown_marker_status_becomes_inconsistent() {
        let marker: PhoneticMarker = serde_json::from_str(
            r#"{"marker": "retroflex stops", "status": "DEGRADED", "detail": "n/a"}"#,
        )
        .unwrap();
        assert_eq!(marker.status, MarkerStatus::Inconsistent);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ForensicReport {
            language: "TAMIL".into(),
            prediction: Prediction::Human,
            confidence: 0.5,
            explanation: "ok".into(),
            transcription: None,
            native_transcript: None,
            technical_features: TechnicalFeatures::default(),
            phonetic_markers: vec![],
            scores: AcousticScores::default(),
            metadata: ReportMetadata {
                detected_language: "TAMIL".into(),
                scan_mode: "QUICK".into(),
                timestamp: "2026-01-01T00:00:00Z".into(),
                session_id: "VX-ABC123".into(),
                latency: "0.90s".into(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["prediction"], "HUMAN");
        assert!(json["technicalFeatures"]["voiceQuality"].is_string());
        assert_eq!(json["metadata"]["sessionId"], "VX-ABC123");
        assert!(json.get("transcription").is_none());
    }
}
