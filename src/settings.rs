//! Simulation settings
//!
//! Every tuning constant in one serde struct. Loaded from a JSON file; any
//! field left out takes its default from `consts`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Body, Joystick, Maze, MovementTuning, Tile, World};

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Edge length of one maze tile, world units
    pub tile_size: f32,
    /// Maze rows, `#` solid and `.` open. `None` uses the stock level.
    pub maze: Option<Vec<String>>,

    // === Movement ===
    pub movement: MovementTuning,
    /// Knob displacement that gives full acceleration
    pub max_pull_distance: f32,

    // === Entity ===
    pub body: Body,
    pub spawn: Vec2,

    // === Loop ===
    /// Wall-clock time between ticks
    pub tick_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            maze: None,

            movement: MovementTuning::default(),
            max_pull_distance: MAX_PULL_DISTANCE,

            body: Body::default(),
            spawn: Vec2::new(SPAWN_X, SPAWN_Y),

            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings =
            Self::from_json(&json).with_context(|| format!("in {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from `path` if given and usable, otherwise defaults
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::from_file(path) {
                Ok(settings) => return settings,
                Err(e) => warn!("{e:#}"),
            }
        }
        info!("Using default settings");
        Self::default()
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check every value is in its domain
    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        ensure!(
            self.tile_size.is_finite() && self.tile_size > 0.0,
            "tile_size must be positive, got {}",
            self.tile_size
        );
        ensure!(
            m.friction > 0.0 && m.friction < 1.0,
            "movement.friction must be in (0, 1), got {}",
            m.friction
        );
        ensure!(
            m.accel_factor.is_finite() && m.accel_factor >= 0.0,
            "movement.accel_factor must be non-negative, got {}",
            m.accel_factor
        );
        ensure!(
            m.max_speed.is_finite() && m.max_speed > 0.0,
            "movement.max_speed must be positive, got {}",
            m.max_speed
        );
        ensure!(
            m.stop_threshold.is_finite() && m.stop_threshold >= 0.0,
            "movement.stop_threshold must be non-negative, got {}",
            m.stop_threshold
        );
        ensure!(
            self.max_pull_distance.is_finite() && self.max_pull_distance > 0.0,
            "max_pull_distance must be positive, got {}",
            self.max_pull_distance
        );
        ensure!(
            self.body.radius.is_finite() && self.body.radius > 0.0,
            "body.radius must be positive, got {}",
            self.body.radius
        );
        ensure!(
            self.body.collision_shrink > 0.0 && self.body.collision_shrink <= 1.0,
            "body.collision_shrink must be in (0, 1], got {}",
            self.body.collision_shrink
        );
        ensure!(self.spawn.is_finite(), "spawn must be finite");
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be at least 1");
        if m.max_speed > self.tile_size {
            warn!(
                "max_speed {} exceeds tile_size {}; fast moves can pass through thin walls",
                m.max_speed, self.tile_size
            );
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn joystick(&self) -> Joystick {
        Joystick::new(self.max_pull_distance)
    }

    /// Build the maze from the configured layout, or the stock level
    pub fn build_maze(&self) -> Result<Maze> {
        match &self.maze {
            Some(rows) => Maze::from_rows(rows.as_slice(), self.tile_size),
            None => Maze::demo_with_tile_size(self.tile_size),
        }
    }

    /// Validate and assemble the simulation world. Fails if the spawn point
    /// is outside the grid, on a solid tile, or already overlapping a wall.
    pub fn world(&self) -> Result<World> {
        self.validate()?;
        let maze = self.build_maze()?;
        let (row, col) = maze.tile_of(self.spawn).with_context(|| {
            format!("spawn ({}, {}) is outside the maze", self.spawn.x, self.spawn.y)
        })?;
        ensure!(
            maze.tile_at(row, col) == Some(Tile::Open),
            "spawn ({}, {}) is on solid tile ({row}, {col})",
            self.spawn.x,
            self.spawn.y
        );
        ensure!(
            !maze.collides(self.spawn, self.body.collision_radius()),
            "spawn ({}, {}) overlaps a solid tile",
            self.spawn.x,
            self.spawn.y
        );
        Ok(World::new(maze, self.movement, self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        let world = settings.world().unwrap();
        assert_eq!(world.maze.rows(), MAZE_ROWS);
        assert_eq!(world.maze.cols(), MAZE_COLS);
        assert_eq!(settings.tick_interval(), TICK_INTERVAL);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "movement": { "max_speed": 6.0 }, "spawn": [60.0, 60.0] }"#)
                .unwrap();
        assert_eq!(settings.movement.max_speed, 6.0);
        assert_eq!(settings.movement.friction, FRICTION);
        assert_eq!(settings.spawn, Vec2::new(60.0, 60.0));
        assert_eq!(settings.tile_size, TILE_SIZE);
    }

    #[test]
    fn test_custom_maze_layout() {
        let settings = Settings::from_json(
            r######"{
                "tile_size": 20.0,
                "maze": ["#####", "#...#", "#...#", "#####"],
                "spawn": [50.0, 40.0]
            }"######,
        )
        .unwrap();
        let world = settings.world().unwrap();
        assert_eq!(world.maze.rows(), 4);
        assert_eq!(world.maze.cols(), 5);
        assert_eq!(world.maze.tile_size(), 20.0);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = Settings::from_json(r#"{ "movement": { "friction": 1.0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("friction"));
    }

    #[test]
    fn test_rejects_bad_shrink() {
        assert!(Settings::from_json(r#"{ "body": { "collision_shrink": 0.0 } }"#).is_err());
        assert!(Settings::from_json(r#"{ "body": { "collision_shrink": 1.5 } }"#).is_err());
    }

    #[test]
    fn test_rejects_spawn_in_wall() {
        let settings = Settings {
            spawn: Vec2::new(5.0, 5.0),
            ..Default::default()
        };
        settings.validate().unwrap();
        assert!(settings.world().is_err());
    }

    #[test]
    fn test_rejects_spawn_outside_grid() {
        for spawn in [Vec2::new(-500.0, -500.0), Vec2::new(1.0e6, 100.0)] {
            let settings = Settings {
                spawn,
                ..Default::default()
            };
            settings.validate().unwrap();
            let err = settings.world().unwrap_err();
            assert!(err.to_string().contains("outside"), "{err:#}");
        }
    }

    #[test]
    fn test_rejects_open_border_layout() {
        let settings = Settings {
            maze: Some(vec!["###".into(), "#..".into(), "###".into()]),
            spawn: Vec2::new(37.5, 37.5),
            ..Default::default()
        };
        assert!(settings.build_maze().is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("joymaze-settings-{}.json", std::process::id()));
        let settings = Settings {
            tick_interval_ms: 8,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let missing = Path::new("/definitely/not/here/joymaze.json");
        assert_eq!(Settings::load(Some(missing)), Settings::default());
        assert_eq!(Settings::load(None), Settings::default());
    }
}
