//! Axis-separated collision resolution against the maze
//!
//! A move is split into its X and Y parts, tried in that fixed order. Each
//! part is accepted whole or rejected whole; there is no projection or
//! push-out. Resolving X first means a diagonal move into a corner keeps the
//! X part when only the combined move is blocked, and keeps the Y part when
//! X alone is blocked. Callers may rely on that order.
//!
//! Moves longer than about one tile per tick can skip over thin walls. Nothing
//! here sweeps the path.

use glam::Vec2;

use super::maze::Maze;

/// Outcome of resolving one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Corrected position
    pub pos: Vec2,
    /// X displacement was rejected
    pub blocked_x: bool,
    /// Y displacement was rejected
    pub blocked_y: bool,
}

impl AxisResolution {
    #[inline]
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Resolve a move from `old` toward `target` for a disc of `radius`,
/// X axis first, then Y using the resolved X.
pub fn resolve_axes(maze: &Maze, old: Vec2, target: Vec2, radius: f32) -> AxisResolution {
    let blocked_x = maze.collides(Vec2::new(target.x, old.y), radius);
    let x = if blocked_x { old.x } else { target.x };

    let blocked_y = maze.collides(Vec2::new(x, target.y), radius);
    let y = if blocked_y { old.y } else { target.y };

    AxisResolution {
        pos: Vec2::new(x, y),
        blocked_x,
        blocked_y,
    }
}

/// Corrected position only; see [`resolve_axes`]
#[inline]
pub fn resolve(maze: &Maze, old: Vec2, target: Vec2, radius: f32) -> Vec2 {
    resolve_axes(maze, old, target, radius).pos
}
