//! Game balance settings
//!
//! Every value has a compile-time default; a JSON document can override any
//! subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::Millis;
use crate::error::SettingsError;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Wheel ===
    /// Wheel diameter after `start()`
    pub initial_wheel_size: f32,
    /// Wheel diameter floor
    pub min_wheel_size: f32,
    /// Diameter change per resize step
    pub resize_step: f32,
    /// Period of the press-and-hold resize process
    pub resize_interval_ms: Millis,
    /// Duration of the size animation after each step
    pub resize_animation_ms: Millis,
    /// Time for one full wheel revolution
    pub rotation_period_ms: Millis,

    // === Obstacles ===
    /// Period of the spawner process
    pub spawn_interval_ms: Millis,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Time for an obstacle to cross from the right edge to off-screen left
    pub obstacle_travel_duration_ms: Millis,
    /// Fraction of viewport height excluded at top and bottom of the
    /// default spawn band
    pub spawn_band_margin: f32,

    // === Session ===
    pub starting_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_wheel_size: 100.0,
            min_wheel_size: 10.0,
            resize_step: 15.0,
            resize_interval_ms: 50,
            resize_animation_ms: 100,
            rotation_period_ms: 500,

            spawn_interval_ms: 800,
            obstacle_width: 50.0,
            obstacle_height: 7.0,
            obstacle_travel_duration_ms: 1000,
            spawn_band_margin: 0.2,

            starting_attempts: 5,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(name: &'static str, reason: &'static str) -> SettingsError {
            SettingsError::Invalid { name, reason }
        }

        if !(self.min_wheel_size.is_finite() && self.min_wheel_size > 0.0) {
            return Err(invalid("min_wheel_size", "must be positive"));
        }
        if !(self.initial_wheel_size.is_finite() && self.initial_wheel_size >= self.min_wheel_size)
        {
            return Err(invalid("initial_wheel_size", "must be at least min_wheel_size"));
        }
        if !(self.resize_step.is_finite() && self.resize_step > 0.0) {
            return Err(invalid("resize_step", "must be positive"));
        }
        if self.resize_interval_ms == 0 {
            return Err(invalid("resize_interval_ms", "must be non-zero"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(invalid("spawn_interval_ms", "must be non-zero"));
        }
        if self.obstacle_travel_duration_ms == 0 {
            return Err(invalid("obstacle_travel_duration_ms", "must be non-zero"));
        }
        if !(self.obstacle_width > 0.0 && self.obstacle_height > 0.0) {
            return Err(invalid("obstacle_width", "obstacle dimensions must be positive"));
        }
        if !(0.0..0.5).contains(&self.spawn_band_margin) {
            return Err(invalid("spawn_band_margin", "must be in [0, 0.5)"));
        }
        if self.starting_attempts == 0 {
            return Err(invalid("starting_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Serialize to pretty JSON (for the demo driver and tooling)
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
