//! Gemini-backed classification client.
//!
//! One blocking request/response call per scan, no retry. The remote
//! engine does the entire forensic judgment; this module only builds the
//! request, enforces the response schema, and maps the decoded verdict
//! into the local report model with documented fallbacks.

use std::env;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose, Engine as _};

use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::payload::AudioPayload;
use crate::models::report::{
    AcousticScores, ForensicReport, MarkerStatus, PhoneticMarker, Prediction, ReportMetadata,
    TechnicalFeatures,
};

use super::schema::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    RawVerdict,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const USER_AGENT: &str = "veritas-voice/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Confidence assumed when the engine omits one.
const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Remote forensic engine client.
pub struct GeminiClassifier {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiClassifier {
    /// Build from the `GEMINI_API_KEY` environment variable.
    ///
    /// A missing or empty credential is fatal before any network attempt.
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_key(env::var(API_KEY_VAR).ok())
    }

    fn from_key(api_key: Option<String>) -> Result<Self, ScanError> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ScanError::MissingCredentials),
        };
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                log::error!("failed to build HTTP client: {}", e);
                ScanError::ClassificationFailed
            })?;
        Ok(Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the engine model id.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn perform(&self, request: &GenerateContentRequest) -> Result<RawVerdict, ScanError> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                log::warn!("forensic engine transport failure: {}", e);
                ScanError::ClassificationFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("forensic engine returned HTTP {}: {}", status, body);
            return Err(ScanError::ClassificationFailed);
        }

        let envelope: GenerateContentResponse = response.json().map_err(|e| {
            log::warn!("forensic engine envelope decode failure: {}", e);
            ScanError::ClassificationFailed
        })?;

        let text = envelope.first_text().ok_or_else(|| {
            log::warn!("forensic engine returned no candidate text");
            ScanError::ClassificationFailed
        })?;

        serde_json::from_str(text).map_err(|e| {
            log::warn!("forensic engine verdict decode failure: {}", e);
            ScanError::ClassificationFailed
        })
    }
}

impl crate::traits::classifier::Classifier for GeminiClassifier {
    fn classify(
        &self,
        payload: &AudioPayload,
        config: &ScanConfiguration,
    ) -> Result<ForensicReport, ScanError> {
        let session_id = new_session_id();
        let request = build_request(payload, config, &session_id);

        log::info!(
            "classifying {} bytes ({}) as session {}",
            payload.len(),
            payload.mime_type(),
            session_id
        );

        let started = Instant::now();
        let raw = self.perform(&request)?;
        let elapsed = started.elapsed().as_secs_f64();

        let report = map_verdict(raw, config, &session_id, elapsed);
        log::info!(
            "session {} resolved to {:?} in {}",
            session_id,
            report.prediction,
            report.metadata.latency
        );
        Ok(report)
    }
}

/// Generate a short upper-case session tag, e.g. `VX-9F31A0`.
pub fn new_session_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("VX-{}", &id[..6])
}

fn system_instruction(config: &ScanConfiguration) -> String {
    format!(
        "You are a high-speed Audio Forensic Auditor.\n\n\
         TASK: Analyze the provided audio and determine if it is AI_GENERATED or HUMAN.\n\
         CRITERIA: Focus on South Asian phonetic markers for {}.\n\n\
         OUTPUT: Provide technical spectral and prosodic justifications.\n\
         Strictly adhere to the provided JSON schema.",
        config.language.as_str()
    )
}

/// Free-text tag embedding session id, language, and mode.
pub fn audit_tag(session_id: &str, config: &ScanConfiguration) -> String {
    format!(
        "AUDIT_ID: {} | LANG: {} | MODE: {}",
        session_id,
        config.language.as_str(),
        config.mode.as_str()
    )
}

fn build_request(
    payload: &AudioPayload,
    config: &ScanConfiguration,
    session_id: &str,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: payload.mime_type().to_string(),
                        data: general_purpose::STANDARD.encode(payload.bytes()),
                    }),
                },
                Part {
                    text: Some(audit_tag(session_id, config)),
                    inline_data: None,
                },
            ],
        }],
        system_instruction: Content::text(system_instruction(config)),
        generation_config: GenerationConfig {
            // Zero temperature: as repeatable as the remote service allows.
            temperature: 0.0,
            response_mime_type: "application/json".into(),
            response_schema: super::schema::verdict_schema(),
        },
    }
}

/// Render a wall-clock duration as the report's latency string.
pub fn format_latency(elapsed_secs: f64) -> String {
    format!("{:.2}s", elapsed_secs)
}

fn marker_status(raw: &str) -> MarkerStatus {
    match raw {
        "PASS" => MarkerStatus::Pass,
        "FAIL" => MarkerStatus::Fail,
        _ => MarkerStatus::Inconsistent,
    }
}

fn clamp_score(raw: Option<f64>) -> u8 {
    raw.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8
}

/// Map a lenient raw verdict into the immutable report, applying the
/// documented fallbacks: missing confidence becomes 0.95 and clamps to
/// [0, 1], the prediction coerces to AI only on an exact match, markers
/// and features default to empty, scores clamp to 0–100.
pub fn map_verdict(
    raw: RawVerdict,
    config: &ScanConfiguration,
    session_id: &str,
    elapsed_secs: f64,
) -> ForensicReport {
    let features = raw.technical_features.unwrap_or_default();
    let scores = raw.scores.unwrap_or_default();

    ForensicReport {
        language: config.language.as_str().to_string(),
        prediction: Prediction::from_wire(raw.prediction.as_deref().unwrap_or_default()),
        confidence: raw.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0),
        explanation: raw.explanation.unwrap_or_default(),
        transcription: raw.transcription,
        native_transcript: raw.native_transcript,
        technical_features: TechnicalFeatures {
            spectral: features.spectral.unwrap_or_default(),
            prosodic: features.prosodic.unwrap_or_default(),
            voice_quality: features.voice_quality.unwrap_or_default(),
        },
        phonetic_markers: raw
            .phonetic_markers
            .into_iter()
            .map(|m| PhoneticMarker {
                marker: m.marker.unwrap_or_default(),
                status: marker_status(m.status.as_deref().unwrap_or_default()),
                detail: m.detail.unwrap_or_default(),
            })
            .collect(),
        scores: AcousticScores {
            spectral_integrity: clamp_score(scores.spectral_integrity),
            prosodic_naturalness: clamp_score(scores.prosodic_naturalness),
            phonetic_authenticity: clamp_score(scores.phonetic_authenticity),
        },
        metadata: ReportMetadata {
            detected_language: config.language.as_str().to_string(),
            scan_mode: config.mode.as_str().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            session_id: session_id.to_string(),
            latency: format_latency(elapsed_secs),
        },
    }
}
