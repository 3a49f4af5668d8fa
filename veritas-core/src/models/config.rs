use serde::{Deserialize, Serialize};

/// Linguistic context for the phonetic audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    English,
    Tamil,
    Hindi,
    Malayalam,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Tamil,
        Language::Hindi,
        Language::Malayalam,
        Language::Telugu,
    ];

    /// Wire name as sent to the remote engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "ENGLISH",
            Language::Tamil => "TAMIL",
            Language::Hindi => "HINDI",
            Language::Malayalam => "MALAYALAM",
            Language::Telugu => "TELUGU",
        }
    }
}

/// Coarse audit depth hint forwarded to the remote engine.
///
/// Has no enforced local effect beyond being embedded in the request tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanMode {
    Quick,
    Deep,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Quick => "QUICK",
            ScanMode::Deep => "DEEP",
        }
    }
}

/// User-selected parameters for one scan session.
///
/// Set before the session starts; read-only while a session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfiguration {
    pub language: Language,
    pub mode: ScanMode,
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            language: Language::English,
            mode: ScanMode::Deep,
        }
    }
}

/// Capture-side settings for live recording.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Target sample rate for the encoded payload in Hz (default: 16000,
    /// sufficient for speech and keeps the upload small).
    pub sample_rate: u32,

    /// Specific input device name, or None for the system default.
    pub device: Option<String>,
}

impl CaptureSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.sample_rate > 192_000 {
            return Err(format!("unreasonable sample rate: {}", self.sample_rate));
        }
        Ok(())
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            device: None,
        }
    }
}
