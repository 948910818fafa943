//! Joymaze - joystick-driven movement through a tile maze
//!
//! Core modules:
//! - `sim`: Deterministic movement core (maze queries, joystick normalization,
//!   velocity integration, axis-separated collision, per-tick step)
//! - `session`: Periodic simulation thread with the input/snapshot boundary
//! - `settings`: Data-driven tuning and maze layout

pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Default configuration constants
///
/// All distances are logical world units (the same space as the maze tiles),
/// speeds are world units per tick.
pub mod consts {
    use std::time::Duration;

    /// Wall-clock spacing between simulation ticks (~60 Hz)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
    /// Simulation step per tick, in nominal ticks
    pub const SIM_DT: f32 = 1.0;

    /// Maze dimensions
    pub const TILE_SIZE: f32 = 25.0;
    pub const MAZE_ROWS: usize = 36;
    pub const MAZE_COLS: usize = 20;

    /// Movement tuning
    pub const MAX_SPEED: f32 = 10.0;
    /// Velocity multiplier applied every tick, in (0, 1)
    pub const FRICTION: f32 = 0.93;
    pub const ACCEL_FACTOR: f32 = 1.2;
    /// Speeds below this snap to zero
    pub const STOP_THRESHOLD: f32 = 0.2;

    /// Joystick displacement that maps to full acceleration
    pub const MAX_PULL_DISTANCE: f32 = 150.0;

    /// Entity shape
    pub const ENTITY_RADIUS: f32 = 12.5;
    /// Collision radius = ENTITY_RADIUS * COLLISION_SHRINK
    pub const COLLISION_SHRINK: f32 = 0.8;

    /// Spawn point
    pub const SPAWN_X: f32 = 170.0;
    pub const SPAWN_Y: f32 = 500.0;
}

/// Rescale `v` so its length does not exceed `max_len`
#[inline]
pub fn clamp_length(v: Vec2, max_len: f32) -> Vec2 {
    let len = v.length();
    if len > max_len {
        v * (max_len / len)
    } else {
        v
    }
}
