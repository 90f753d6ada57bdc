//! Time-parameterized interpolation
//!
//! Anything that moves (the wheel's displayed size, obstacle x positions) is
//! stored as start value, end value, start time and duration. The current
//! value is a pure function of the logical clock, so nothing accumulates
//! per-frame drift.

use serde::{Deserialize, Serialize};

use crate::consts::Millis;
use crate::{ease_in_out, lerp};

/// Interpolation curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
}

/// A scalar animation between two values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: Millis,
    pub duration: Millis,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: Millis, duration: Millis, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// A tween already resting at `value`
    pub fn fixed(value: f32, start: Millis) -> Self {
        Self::new(value, value, start, 0, Easing::Linear)
    }

    /// Raw progress in [0, 1]
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration == 0 || now >= self.start + self.duration {
            return 1.0;
        }
        if now <= self.start {
            return 0.0;
        }
        (now - self.start) as f32 / self.duration as f32
    }

    /// Interpolated value at `now`
    pub fn value_at(&self, now: Millis) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let t = match self.easing {
            Easing::Linear => t,
            Easing::EaseInOut => ease_in_out(t),
        };
        lerp(self.from, self.to, t)
    }

    #[inline]
    pub fn is_finished(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }

    /// Redirect toward a new target, starting from wherever the tween is now
    pub fn retarget(&mut self, to: f32, now: Millis, duration: Millis) {
        let from = self.value_at(now);
        *self = Self::new(from, to, now, duration, self.easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        let tween = Tween::new(390.0, -50.0, 1000, 1000, Easing::Linear);
        assert_eq!(tween.value_at(0), 390.0);
        assert_eq!(tween.value_at(1000), 390.0);
        assert!((tween.value_at(1500) - 170.0).abs() < 1e-3);
        assert_eq!(tween.value_at(2000), -50.0);
        assert_eq!(tween.value_at(5000), -50.0);
        assert!(!tween.is_finished(1999));
        assert!(tween.is_finished(2000));
    }

    #[test]
    fn test_zero_duration_is_immediately_finished() {
        let tween = Tween::fixed(100.0, 10);
        assert!(tween.is_finished(0));
        assert_eq!(tween.value_at(0), 100.0);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut tween = Tween::new(100.0, 115.0, 0, 100, Easing::Linear);
        tween.retarget(130.0, 50, 100);
        assert!((tween.from - 107.5).abs() < 1e-3);
        assert_eq!(tween.start, 50);
        assert_eq!(tween.value_at(150), 130.0);
    }

    #[test]
    fn test_ease_in_out_hits_endpoints() {
        let tween = Tween::new(0.0, 10.0, 0, 100, Easing::EaseInOut);
        assert_eq!(tween.value_at(0), 0.0);
        assert!((tween.value_at(50) - 5.0).abs() < 1e-3);
        assert_eq!(tween.value_at(100), 10.0);
    }
}
