//! Velocity integration
//!
//! Per tick: accelerate along the joystick, apply drag, cap the speed, and
//! snap tiny speeds to rest. Units are world units per nominal tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::joystick::JoystickReading;
use crate::clamp_length;
use crate::consts::{ACCEL_FACTOR, FRICTION, MAX_SPEED, STOP_THRESHOLD};

/// Movement tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Speed gained per tick at full pull
    pub accel_factor: f32,
    /// Velocity multiplier per tick, in (0, 1). Applied with or without input.
    pub friction: f32,
    pub max_speed: f32,
    /// Speeds below this become exactly zero
    pub stop_threshold: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            accel_factor: ACCEL_FACTOR,
            friction: FRICTION,
            max_speed: MAX_SPEED,
            stop_threshold: STOP_THRESHOLD,
        }
    }
}

/// Advance `velocity` by `dt` nominal ticks.
///
/// With `dt == 1.0` this is exactly: `v += dir * mag * accel`, `v *= friction`,
/// cap at `max_speed`, zero if below `stop_threshold`. Other `dt` values scale
/// the impulse linearly and the drag geometrically. Pure: identical inputs
/// give bit-identical output.
pub fn step(velocity: Vec2, input: &JoystickReading, tuning: &MovementTuning, dt: f32) -> Vec2 {
    let accel = input.thrust() * tuning.accel_factor;

    let mut vel = if dt == 1.0 {
        (velocity + accel) * tuning.friction
    } else {
        (velocity + accel * dt) * tuning.friction.powf(dt)
    };

    vel = clamp_length(vel, tuning.max_speed);

    if vel.length() < tuning.stop_threshold {
        vel = Vec2::ZERO;
    }
    vel
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn push(x: f32, y: f32, magnitude: f32) -> JoystickReading {
        JoystickReading {
            direction: Vec2::new(x, y).normalize(),
            magnitude,
        }
    }

    #[test]
    fn test_single_step_from_rest() {
        let tuning = MovementTuning::default();
        let vel = step(Vec2::ZERO, &push(1.0, 0.0, 1.0), &tuning, 1.0);
        // (0 + 1.2) * 0.93
        assert!((vel.x - 1.2 * 0.93).abs() < 1e-6);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_reaches_and_holds_max_speed() {
        let tuning = MovementTuning::default();
        let input = push(0.0, -1.0, 1.0);
        let mut vel = Vec2::ZERO;
        for _ in 0..200 {
            vel = step(vel, &input, &tuning, 1.0);
        }
        // Terminal speed without the cap would be 1.2*0.93/0.07 ~ 15.9
        assert!((vel.length() - tuning.max_speed).abs() < 1e-4);
        assert!(vel.y < 0.0);
    }

    #[test]
    fn test_friction_without_input_decays_to_rest() {
        let tuning = MovementTuning::default();
        let mut vel = Vec2::new(6.0, -8.0);
        let mut ticks = 0;
        while vel != Vec2::ZERO {
            let next = step(vel, &JoystickReading::IDLE, &tuning, 1.0);
            assert!(next.length() < vel.length());
            vel = next;
            ticks += 1;
            assert!(ticks < 1000, "never came to rest");
        }
        // 10 * 0.93^n < 0.2 first at n = 54
        assert_eq!(ticks, 54);
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let tuning = MovementTuning::default();
        let vel = step(Vec2::new(300.0, 400.0), &JoystickReading::IDLE, &tuning, 1.0);
        assert!((vel.length() - tuning.max_speed).abs() < 1e-4);
        let dir = vel.normalize();
        assert!((dir.x - 0.6).abs() < 1e-5);
        assert!((dir.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_weak_input_below_threshold_stays_at_rest() {
        let tuning = MovementTuning::default();
        // 0.1 * 1.2 * 0.93 = 0.1116 < 0.2
        let vel = step(Vec2::ZERO, &push(1.0, 1.0, 0.1), &tuning, 1.0);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_deterministic() {
        let tuning = MovementTuning::default();
        let input = push(0.3, -0.7, 0.42);
        let v0 = Vec2::new(1.234, -5.678);
        let a = step(v0, &input, &tuning, 1.0);
        let b = step(v0, &input, &tuning, 1.0);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            vx in -1.0e4f32..1.0e4,
            vy in -1.0e4f32..1.0e4,
            angle in 0.0f32..std::f32::consts::TAU,
            magnitude in 0.0f32..=1.0,
            dt in 0.1f32..4.0,
        ) {
            let tuning = MovementTuning::default();
            let input = JoystickReading {
                direction: Vec2::from_angle(angle),
                magnitude,
            };
            let vel = step(Vec2::new(vx, vy), &input, &tuning, dt);
            prop_assert!(vel.length() <= tuning.max_speed * (1.0 + 1e-5));
        }

        #[test]
        fn prop_slow_and_idle_snaps_to_zero(
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 0.0f32..STOP_THRESHOLD,
        ) {
            let tuning = MovementTuning::default();
            let vel = step(Vec2::from_angle(angle) * speed, &JoystickReading::IDLE, &tuning, 1.0);
            prop_assert_eq!(vel, Vec2::ZERO);
        }
    }
}
