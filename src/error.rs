//! Recoverable configuration errors
//!
//! Nothing in the simulation core is fatal. These are returned to the caller
//! (and logged at warn level) when a configuration request is rejected.

/// Rejected spawn band reconfiguration. The previous band stays in effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnBandError {
    /// Top edge is not strictly above the bottom edge
    #[error("invalid spawn band: top {top} must be below bottom {bottom}")]
    Inverted { top: f32, bottom: f32 },

    /// NaN or infinite bound
    #[error("invalid spawn band: bounds must be finite (top {top}, bottom {bottom})")]
    NonFinite { top: f32, bottom: f32 },

    /// Distance between the bounds overflows f32
    #[error("invalid spawn band: span from {top} to {bottom} is not representable")]
    SpanOverflow { top: f32, bottom: f32 },
}

/// Settings could not be loaded or failed validation
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, or settings that could not be encoded
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value outside its usable range
    #[error("invalid setting `{name}`: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}
