//! Joymaze headless demo
//!
//! Runs a session with a wandering, seeded joystick standing in for a
//! player's thumb, and logs what a renderer would draw.
//!
//! Usage: `joymaze [settings.json] [seconds]`

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use joymaze::sim::{Maze, MotionPhase};
use joymaze::{Session, Settings};

/// Presentation frame spacing
const FRAME: Duration = Duration::from_millis(16);
/// How often the fake thumb picks a new direction
const RETARGET_EVERY: Duration = Duration::from_millis(700);
const DEFAULT_SECONDS: f32 = 5.0;
const SEED: u64 = 0x6a6f_796d;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next().map(PathBuf::from) {
        Some(path) => Settings::from_file(&path)?,
        None => Settings::load(None),
    };
    let seconds: f32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("bad duration {s:?}"))?,
        None => DEFAULT_SECONDS,
    };

    log::info!("Joymaze (headless) starting, running for {seconds}s");
    let session = Session::start(&settings)?;
    let maze = session.maze().clone();

    let mut rng = Pcg32::seed_from_u64(SEED);
    let stick = settings.joystick();
    let pull = stick.max_pull;
    let mut knob = Vec2::ZERO;
    let mut last_retarget = Instant::now();
    let mut last_report = Instant::now();
    let mut last_phase = MotionPhase::Idle;

    let started = Instant::now();
    while started.elapsed().as_secs_f32() < seconds {
        if last_retarget.elapsed() >= RETARGET_EVERY {
            // Occasionally let go so the entity coasts to a stop
            knob = if rng.random_bool(0.2) {
                Vec2::ZERO
            } else {
                Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
                    * rng.random_range(0.3f32..1.2)
                    * pull
            };
            knob = stick.clamp_knob(knob);
            session.publish_joystick_input(knob.x, knob.y);
            last_retarget = Instant::now();
        }

        let snap = session.current_motion_state();
        if snap.phase != last_phase {
            log::info!(
                "{} at ({:.1}, {:.1})",
                snap.phase.as_str(),
                snap.pos.x,
                snap.pos.y
            );
            last_phase = snap.phase;
        }
        if last_report.elapsed() >= Duration::from_secs(1) {
            log::info!(
                "tick {}: ({:.1}, {:.1}) {} knob=({:.0}, {:.0})",
                snap.tick,
                snap.pos.x,
                snap.pos.y,
                snap.phase.as_str(),
                knob.x,
                knob.y
            );
            last_report = Instant::now();
        }

        thread::sleep(FRAME);
    }

    let final_state = session.stop().context("simulation thread panicked")?;
    println!("{}", render(&maze, final_state.pos));
    log::info!(
        "Finished after {} ticks at ({:.1}, {:.1})",
        final_state.time_ticks,
        final_state.pos.x,
        final_state.pos.y
    );
    Ok(())
}

/// ASCII map with `@` on the entity's tile
fn render(maze: &Maze, pos: Vec2) -> String {
    let mut lines: Vec<Vec<char>> = maze
        .to_string()
        .lines()
        .map(|l| l.chars().collect())
        .collect();
    if let Some((row, col)) = maze.tile_of(pos) {
        lines[row][col] = '@';
    }
    lines
        .into_iter()
        .map(|l| l.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
