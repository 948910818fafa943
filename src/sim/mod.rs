//! Deterministic movement core
//!
//! Everything in here is pure and single-threaded:
//! - Fixed timestep only
//! - No hidden state; identical inputs give bit-identical results
//! - No threads, clocks, or I/O (see `session` for those)

pub mod collision;
pub mod joystick;
pub mod maze;
pub mod movement;
pub mod state;
pub mod tick;

pub use collision::{AxisResolution, resolve, resolve_axes};
pub use joystick::{Joystick, JoystickReading, normalize};
pub use maze::{Maze, Tile, TileRect};
pub use movement::{MovementTuning, step};
pub use state::{Body, MotionPhase, MotionSnapshot, MotionState};
pub use tick::{TickInput, World, tick};
