/// An input device available for live capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Real-time input metering (RMS and peak, 0.0–1.0 for normalized audio).
///
/// Display-only: drives the level meter during capture and carries no
/// correctness requirement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalLevels {
    pub rms: f32,
    pub peak: f32,
}
