//! Joystick normalization
//!
//! Turns a raw knob displacement (logical units, same space as the maze)
//! into a unit direction and a 0..1 pull strength.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_length;
use crate::consts::MAX_PULL_DISTANCE;

/// Normalized joystick sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JoystickReading {
    /// Unit vector, or zero when idle
    pub direction: Vec2,
    /// Pull strength in [0, 1]
    pub magnitude: f32,
}

impl JoystickReading {
    pub const IDLE: Self = Self {
        direction: Vec2::ZERO,
        magnitude: 0.0,
    };

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.magnitude == 0.0
    }

    /// Finite, magnitude in range, and direction either zero (idle) or unit length
    pub fn is_valid(&self) -> bool {
        if !self.direction.is_finite() || !(0.0..=1.0).contains(&self.magnitude) {
            return false;
        }
        if self.direction == Vec2::ZERO {
            self.magnitude == 0.0
        } else {
            (self.direction.length() - 1.0).abs() < 1e-3
        }
    }

    /// Direction scaled by pull strength
    #[inline]
    pub fn thrust(&self) -> Vec2 {
        self.direction * self.magnitude
    }
}

/// Normalize a raw displacement against `max_pull`.
///
/// A zero displacement yields [`JoystickReading::IDLE`]. No validation is
/// done here; see [`Joystick::read`] for the guarded entry point.
pub fn normalize(dx: f32, dy: f32, max_pull: f32) -> JoystickReading {
    let dist = dx.hypot(dy);
    if dist == 0.0 {
        return JoystickReading::IDLE;
    }
    JoystickReading {
        direction: Vec2::new(dx / dist, dy / dist),
        magnitude: (dist / max_pull).min(1.0),
    }
}

/// Input-side joystick model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joystick {
    /// Displacement that maps to full strength
    pub max_pull: f32,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            max_pull: MAX_PULL_DISTANCE,
        }
    }
}

impl Joystick {
    pub fn new(max_pull: f32) -> Self {
        Self { max_pull }
    }

    /// Keep the knob inside the pull radius, preserving its direction
    pub fn clamp_knob(&self, raw: Vec2) -> Vec2 {
        clamp_length(raw, self.max_pull)
    }

    #[inline]
    pub fn normalize(&self, dx: f32, dy: f32) -> JoystickReading {
        normalize(dx, dy, self.max_pull)
    }

    /// Normalize a raw sample, or `None` if it is non-finite or otherwise
    /// can't produce a valid reading. Callers keep their previous reading.
    pub fn read(&self, dx: f32, dy: f32) -> Option<JoystickReading> {
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        let reading = self.normalize(dx, dy);
        reading.is_valid().then_some(reading)
    }
}
