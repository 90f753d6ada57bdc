//! Wheel Dodge - simulation core for a wheel-resizing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wheel, obstacles, collisions, scheduling)
//! - `settings`: Data-driven game balance
//! - `error`: Recoverable configuration errors
//!
//! Rendering, audio and input wiring live outside this crate. A host drives
//! the simulation with `GameState::frame(now_ms)` and subscribes to events.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SpawnBandError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical time in milliseconds since the host's epoch
    pub type Millis = u64;

    /// Nominal display refresh used by the demo driver (ms per frame, rounded)
    pub const FRAME_MS: Millis = 16;

    /// Default viewport used when the host has no better idea
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 390.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 844.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smooth ease-in-out curve on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn test_ease_in_out_clamped() {
        assert_eq!(ease_in_out(-1.0), 0.0);
        assert_eq!(ease_in_out(2.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }
}
