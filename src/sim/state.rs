//! Entity motion state and the snapshot published to readers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::joystick::JoystickReading;
use crate::consts::{COLLISION_SHRINK, ENTITY_RADIUS};

/// Physical shape of the entity: a disc of fixed radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub radius: f32,
    /// Fraction of `radius` used for wall tests, in (0, 1]. Slightly under
    /// 1 so a disc resting flush against a tile seam isn't reported as hitting it.
    pub collision_shrink: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            radius: ENTITY_RADIUS,
            collision_shrink: COLLISION_SHRINK,
        }
    }
}

impl Body {
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.radius * self.collision_shrink
    }
}

/// Coarse motion state, derived from speed after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    /// Speed is exactly zero
    #[default]
    Idle,
    Moving,
}

impl MotionPhase {
    pub fn from_velocity(vel: Vec2) -> Self {
        if vel == Vec2::ZERO {
            MotionPhase::Idle
        } else {
            MotionPhase::Moving
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPhase::Idle => "Idle",
            MotionPhase::Moving => "Moving",
        }
    }
}

/// Full state of the single simulated entity. Owned by the simulation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: MotionPhase,
    /// Last accepted joystick reading, reused until a newer valid one arrives
    pub input: JoystickReading,
    /// Ticks simulated so far
    pub time_ticks: u64,
}

impl MotionState {
    /// Entity at rest at `pos`
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            phase: MotionPhase::Idle,
            input: JoystickReading::IDLE,
            time_ticks: 0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            pos: self.pos,
            phase: self.phase,
            tick: self.time_ticks,
        }
    }
}

/// Read-only view handed to the rendering side. Position is always published
/// as one value, never X and Y separately.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub pos: Vec2,
    pub phase: MotionPhase,
    /// Tick that produced this snapshot; 0 before the first tick
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = MotionState::new(Vec2::new(170.0, 500.0));
        assert_eq!(state.phase, MotionPhase::Idle);
        assert_eq!(state.speed(), 0.0);
        let snap = state.snapshot();
        assert_eq!(snap.pos, Vec2::new(170.0, 500.0));
        assert_eq!(snap.tick, 0);
    }

    #[test]
    fn test_default_collision_radius() {
        let body = Body::default();
        assert!((body.collision_radius() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_phase_from_velocity() {
        assert_eq!(MotionPhase::from_velocity(Vec2::ZERO), MotionPhase::Idle);
        assert_eq!(
            MotionPhase::from_velocity(Vec2::new(0.0, 1.0e-9)),
            MotionPhase::Moving
        );
    }
}
