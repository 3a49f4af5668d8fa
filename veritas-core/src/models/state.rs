use super::error::ScanError;
use super::report::ForensicReport;

/// Scan session state machine.
///
/// State transitions:
/// ```text
/// idle → capturing → classifying → resulted / failed
///   │        │                          │        │
///   │        └── cancel ──→ idle        └─ reset ┴─→ idle
///   └── submit ──→ classifying
/// ```
/// File submission skips `capturing`. `resulted` and `failed` leave only
/// via an explicit reset.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Capturing { duration_secs: f64 },
    Classifying,
    Resulted(Box<ForensicReport>),
    Failed(ScanError),
}

impl ScanState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    pub fn is_classifying(&self) -> bool {
        matches!(self, Self::Classifying)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resulted(_) | Self::Failed(_))
    }

    /// Elapsed capture time, if this state tracks one.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::Capturing { duration_secs } => Some(*duration_secs),
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing { .. } => "capturing",
            Self::Classifying => "classifying",
            Self::Resulted(_) => "resulted",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ScanState::Idle.is_terminal());
        assert!(!ScanState::Classifying.is_terminal());
        assert!(ScanState::Failed(ScanError::ClassificationFailed).is_terminal());
    }

    #[test]
    fn duration_only_while_capturing() {
        assert_eq!(ScanState::Capturing { duration_secs: 2.5 }.duration(), Some(2.5));
        assert_eq!(ScanState::Idle.duration(), None);
        assert_eq!(ScanState::Classifying.duration(), None);
    }
}
