//! Wire types for the `generateContent` call.
//!
//! The request side mirrors the Gemini REST JSON shape; the response side
//! is decoded in two steps: the envelope (candidates → parts → text) and
//! then the model's JSON text as a deliberately lenient `RawVerdict`,
//! where every field is optional. Fallbacks are applied during mapping,
//! not during decode, so a sloppy model answer degrades instead of
//! failing outright.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: Content,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded audio bytes.
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: Value,
}

/// The fixed response schema the engine is instructed to honor.
///
/// `nativeTranscript` is the only optional field; everything else is
/// required at the schema level (enforcement still happens leniently on
/// our side).
pub fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "prediction": { "type": "STRING", "description": "Must be AI_GENERATED or HUMAN" },
            "confidence": { "type": "NUMBER" },
            "explanation": { "type": "STRING" },
            "transcription": { "type": "STRING" },
            "nativeTranscript": { "type": "STRING" },
            "technicalFeatures": {
                "type": "OBJECT",
                "properties": {
                    "spectral": { "type": "STRING" },
                    "prosodic": { "type": "STRING" },
                    "voiceQuality": { "type": "STRING" }
                },
                "required": ["spectral", "prosodic", "voiceQuality"]
            },
            "phoneticMarkers": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "marker": { "type": "STRING" },
                        "status": { "type": "STRING" },
                        "detail": { "type": "STRING" }
                    },
                    "required": ["marker", "status", "detail"]
                }
            },
            "scores": {
                "type": "OBJECT",
                "properties": {
                    "spectralIntegrity": { "type": "NUMBER" },
                    "prosodicNaturalness": { "type": "NUMBER" },
                    "phoneticAuthenticity": { "type": "NUMBER" }
                },
                "required": ["spectralIntegrity", "prosodicNaturalness", "phoneticAuthenticity"]
            }
        },
        "required": [
            "prediction", "confidence", "explanation", "transcription",
            "technicalFeatures", "phoneticMarkers", "scores"
        ]
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Lenient decode of the model's verdict JSON. Every field optional;
/// defaults are applied during mapping.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVerdict {
    pub prediction: Option<String>,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub transcription: Option<String>,
    pub native_transcript: Option<String>,
    pub technical_features: Option<RawFeatures>,
    #[serde(default)]
    pub phonetic_markers: Vec<RawMarker>,
    pub scores: Option<RawScores>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeatures {
    pub spectral: Option<String>,
    pub prosodic: Option<String>,
    pub voice_quality: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarker {
    pub marker: Option<String>,
    pub status: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScores {
    pub spectral_integrity: Option<f64>,
    pub prosodic_naturalness: Option<f64>,
    pub phonetic_authenticity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_required_top_level_fields() {
        let schema = verdict_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"prediction"));
        assert!(required.contains(&"scores"));
        // nativeTranscript stays optional
        assert!(!required.contains(&"nativeTranscript"));
    }

    #[test]
    fn first_text_walks_the_envelope() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"prediction\":\"HUMAN\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{\"prediction\":\"HUMAN\"}"));
    }

    #[test]
    fn first_text_none_on_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn raw_verdict_tolerates_sparse_payloads() {
        let raw: RawVerdict = serde_json::from_str(r#"{"prediction": "HUMAN"}"#).unwrap();
        assert_eq!(raw.prediction.as_deref(), Some("HUMAN"));
        assert!(raw.confidence.is_none());
        assert!(raw.phonetic_markers.is_empty());
        assert!(raw.scores.is_none());
    }

    #[test]
    fn request_serializes_inline_data_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "audio/wav".into(),
                            data: "AAAA".into(),
                        }),
                    },
                    Part {
                        text: Some("AUDIT_ID: VX-000000".into()),
                        inline_data: None,
                    },
                ],
            }],
            system_instruction: Content::text("audit"),
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".into(),
                response_schema: verdict_schema(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "audio/wav");
        assert!(json["contents"][0]["parts"][0].get("text").is_none());
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }
}
