//! Static tile maze and disc overlap queries
//!
//! The maze is a fixed grid of `Open`/`Solid` tiles. The outermost ring of
//! tiles is always solid; every constructor enforces that, so an entity can
//! never leave the grid even though queries clamp to the grid bounds rather
//! than treating outside coordinates as walls.

use std::fmt;
use std::ops::RangeInclusive;

use anyhow::{Context, Result, bail, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAZE_COLS, MAZE_ROWS, TILE_SIZE};

/// Kind of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Open,
    Solid,
}

impl Tile {
    /// Layout glyph: `#` solid, `.` open
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' => Some(Tile::Solid),
            '.' => Some(Tile::Open),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Open => '.',
            Tile::Solid => '#',
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self == Tile::Solid
    }
}

/// World-space rectangle covered by one tile (`min` inclusive, `max` exclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl TileRect {
    /// Strict overlap with another axis-aligned box; touching edges do not count
    #[inline]
    pub fn overlaps(&self, min: Vec2, max: Vec2) -> bool {
        max.x > self.min.x && min.x < self.max.x && max.y > self.min.y && min.y < self.max.y
    }
}

/// Immutable tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    tile_size: f32,
    /// Row-major
    tiles: Vec<Tile>,
}

impl Maze {
    /// Build a maze from a per-cell function. Border cells are forced solid
    /// regardless of what `f` returns.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        tile_size: f32,
        f: impl FnMut(usize, usize) -> Tile,
    ) -> Result<Self> {
        ensure!(
            rows >= 3 && cols >= 3,
            "maze must be at least 3x3, got {rows}x{cols}"
        );
        ensure!(
            tile_size.is_finite() && tile_size > 0.0,
            "tile size must be positive, got {tile_size}"
        );
        Ok(Self::bordered(rows, cols, tile_size, f))
    }

    /// The stock level: solid border plus two interior walls
    pub fn demo() -> Self {
        Self::bordered(MAZE_ROWS, MAZE_COLS, TILE_SIZE, demo_tile)
    }

    /// Stock level layout with a different tile size
    pub fn demo_with_tile_size(tile_size: f32) -> Result<Self> {
        Self::from_fn(MAZE_ROWS, MAZE_COLS, tile_size, demo_tile)
    }

    /// Parse an ASCII layout (`#` solid, `.` open), one line per row.
    ///
    /// Blank lines and surrounding whitespace are ignored. Unlike
    /// [`Maze::from_fn`], an open border cell is an error rather than being
    /// patched.
    pub fn parse(layout: &str, tile_size: f32) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Self::from_rows(&lines, tile_size)
    }

    /// Same as [`Maze::parse`] with the rows already split
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self> {
        ensure!(!rows.is_empty(), "maze layout is empty");
        let cols = rows[0].as_ref().chars().count();

        let mut tiles = Vec::with_capacity(rows.len() * cols);
        for (r, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            ensure!(
                line.chars().count() == cols,
                "maze row {r} has {} columns, expected {cols}",
                line.chars().count()
            );
            for (c, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph)
                    .with_context(|| format!("unknown glyph {glyph:?} at row {r}, column {c}"))?;
                tiles.push(tile);
            }
        }

        let maze = Self::from_fn(rows.len(), cols, tile_size, |r, c| tiles[r * cols + c])?;
        if maze.tiles != tiles {
            bail!("maze border must be solid");
        }
        Ok(maze)
    }

    fn bordered(
        rows: usize,
        cols: usize,
        tile_size: f32,
        mut f: impl FnMut(usize, usize) -> Tile,
    ) -> Self {
        let mut tiles = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let border = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
                tiles.push(if border { Tile::Solid } else { f(row, col) });
            }
        }
        Self {
            rows,
            cols,
            tile_size,
            tiles,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width/height of the whole grid in world units
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.tile_size
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.rows && col < self.cols {
            Some(self.tiles[row * self.cols + col])
        } else {
            None
        }
    }

    /// Bounds-checked solidity; anything outside the grid counts as solid
    pub fn is_solid(&self, row: i64, col: i64) -> bool {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) => self.tile_at(r, c).is_none_or(Tile::is_solid),
            _ => true,
        }
    }

    /// Tile containing a world point, if it lies inside the grid
    pub fn tile_of(&self, point: Vec2) -> Option<(usize, usize)> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.tile_size).floor() as usize;
        let row = (point.y / self.tile_size).floor() as usize;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// World rectangle covered by a tile
    pub fn tile_rect(&self, row: usize, col: usize) -> TileRect {
        let min = Vec2::new(col as f32, row as f32) * self.tile_size;
        TileRect {
            min,
            max: min + Vec2::splat(self.tile_size),
        }
    }

    /// `(row, col)` of every solid tile, row-major
    pub fn solid_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_solid())
            .map(move |(i, _)| (i / cols, i % cols))
    }

    /// Whether a disc at `center` with `radius` touches any solid tile.
    ///
    /// This tests the disc's bounding box, not the disc itself, so a disc
    /// sitting diagonally off a tile corner reports a hit a true circle test
    /// would not. The approximation is deliberate.
    pub fn collides(&self, center: Vec2, radius: f32) -> bool {
        let min = center - Vec2::splat(radius);
        let max = center + Vec2::splat(radius);

        for row in self.index_range(min.y, max.y, self.rows) {
            for col in self.index_range(min.x, max.x, self.cols) {
                if self.tiles[row * self.cols + col].is_solid()
                    && self.tile_rect(row, col).overlaps(min, max)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Tile indices spanned by `[lo, hi]`, clamped into `0..len`
    fn index_range(&self, lo: f32, hi: f32, len: usize) -> RangeInclusive<usize> {
        let last = len - 1;
        // `as usize` saturates: negatives and NaN become 0, huge values usize::MAX
        let to_index = |v: f32| ((v / self.tile_size).floor() as usize).min(last);
        to_index(lo)..=to_index(hi)
    }
}

fn demo_tile(row: usize, col: usize) -> Tile {
    if (col == 5 && (5..=10).contains(&row)) || (col == 10 && (20..=30).contains(&row)) {
        Tile::Solid
    } else {
        Tile::Open
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::demo()
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.cols) {
            let line: String = row.iter().map(|t| t.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
