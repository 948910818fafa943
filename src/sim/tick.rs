//! Fixed timestep simulation tick
//!
//! One step of the movement loop: take the newest joystick reading,
//! integrate velocity, resolve the move against the maze, update the phase.

use std::sync::Arc;

use glam::Vec2;
use log::{debug, trace, warn};

use super::collision::{AxisResolution, resolve_axes};
use super::joystick::JoystickReading;
use super::maze::Maze;
use super::movement::{MovementTuning, step};
use super::state::{Body, MotionPhase, MotionState};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Reading published since the previous tick. `None` keeps the last one.
    pub joystick: Option<JoystickReading>,
}

impl TickInput {
    pub fn joystick(reading: JoystickReading) -> Self {
        Self {
            joystick: Some(reading),
        }
    }
}

/// Immutable world the entity moves through
#[derive(Debug, Clone)]
pub struct World {
    pub maze: Arc<Maze>,
    pub movement: MovementTuning,
    pub body: Body,
}

impl World {
    pub fn new(maze: Maze, movement: MovementTuning, body: Body) -> Self {
        Self {
            maze: Arc::new(maze),
            movement,
            body,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Maze::demo(), MovementTuning::default(), Body::default())
    }
}

/// Advance the motion state by one fixed timestep
pub fn tick(state: &mut MotionState, input: &TickInput, world: &World, dt: f32) -> AxisResolution {
    if let Some(reading) = input.joystick {
        if reading.is_valid() {
            state.input = reading;
        } else {
            warn!("Discarding invalid joystick reading {reading:?}");
        }
    }

    let vel = step(state.vel, &state.input, &world.movement, dt);
    let target = state.pos + vel * dt;

    let resolution = if target.is_finite() {
        state.vel = vel;
        resolve_axes(&world.maze, state.pos, target, world.body.collision_radius())
    } else {
        warn!("Non-finite move target {target:?}, holding position");
        state.vel = Vec2::ZERO;
        AxisResolution {
            pos: state.pos,
            blocked_x: true,
            blocked_y: true,
        }
    };
    state.pos = resolution.pos;

    let phase = MotionPhase::from_velocity(state.vel);
    if phase != state.phase {
        debug!(
            "Tick {}: {} -> {} at ({:.1}, {:.1})",
            state.time_ticks,
            state.phase.as_str(),
            phase.as_str(),
            state.pos.x,
            state.pos.y
        );
        state.phase = phase;
    }
    state.time_ticks += 1;

    trace!(
        "Tick {}: pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) blocked=({}, {})",
        state.time_ticks,
        state.pos.x,
        state.pos.y,
        state.vel.x,
        state.vel.y,
        resolution.blocked_x,
        resolution.blocked_y
    );

    resolution
}
