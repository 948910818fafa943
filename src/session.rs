//! Simulation session: the movement loop on its own thread
//!
//! One thread owns the `MotionState` and ticks it at a fixed interval. The
//! input side publishes joystick samples without blocking (newest wins, no
//! queue); the rendering side reads the latest snapshot without blocking.
//! Both cells are swapped as whole values, so a reader never sees X from one
//! tick and Y from another.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::atomic::AtomicCell;
use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use glam::Vec2;
use log::{error, info, warn};

use crate::consts::SIM_DT;
use crate::settings::Settings;
use crate::sim::{Joystick, JoystickReading, Maze, MotionSnapshot, MotionState, TickInput, World, tick};

// Lag (in intervals) before the loop reports it is falling behind
const BEHIND_WARN_INTERVALS: u32 = 4;

// state shared between the loop thread and session handle
struct Shared {
    // newest reading not yet consumed by a tick
    pending: AtomicCell<Option<JoystickReading>>,
    snapshot: AtomicCell<MotionSnapshot>,
}

/// Handle to a running simulation loop. Dropping it stops the loop.
pub struct Session {
    shared: Arc<Shared>,
    joystick: Joystick,
    maze: Arc<Maze>,
    // dropping the sender wakes the loop and ends it
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<MotionState>>,
}

impl Session {
    /// Validate settings, build the world, and start ticking
    pub fn start(settings: &Settings) -> Result<Self> {
        let world = settings.world()?;
        Self::spawn(world, settings.spawn, settings.joystick(), settings.tick_interval())
    }

    /// Start a loop over an already built world with the entity at rest at `spawn`
    pub fn spawn(world: World, spawn: Vec2, joystick: Joystick, interval: Duration) -> Result<Self> {
        let state = MotionState::new(spawn);
        let shared = Arc::new(Shared {
            pending: AtomicCell::new(None),
            snapshot: AtomicCell::new(state.snapshot()),
        });
        let maze = Arc::clone(&world.maze);
        let (stop_tx, stop_rx) = channel::bounded(0);

        let thread = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("joymaze-sim".into())
                .spawn(move || run(world, state, shared, interval, stop_rx))
                .context("failed to spawn simulation thread")?
        };

        info!(
            "Session started at ({:.1}, {:.1}), tick every {:?}",
            spawn.x, spawn.y, interval
        );
        Ok(Session {
            shared,
            joystick,
            maze,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// Publish a raw knob displacement (logical units). Never blocks.
    ///
    /// Displacements past the pull radius saturate at full strength. Samples
    /// that are non-finite or overflow are dropped and the loop keeps using
    /// the previous reading; returns whether the sample was accepted.
    pub fn publish_joystick_input(&self, dx: f32, dy: f32) -> bool {
        match self.joystick.read(dx, dy) {
            Some(reading) => {
                self.shared.pending.store(Some(reading));
                true
            }
            None => {
                warn!("Dropping unusable joystick sample ({dx}, {dy})");
                false
            }
        }
    }

    /// Latest published position and phase
    pub fn current_motion_state(&self) -> MotionSnapshot {
        self.shared.snapshot.load()
    }

    /// The maze being simulated, for drawing
    pub fn maze(&self) -> &Arc<Maze> {
        &self.maze
    }

    /// Stop the loop at the next tick boundary and return the final state.
    /// `None` if the loop thread panicked.
    pub fn stop(mut self) -> Option<MotionState> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<MotionState> {
        drop(self.stop_tx.take());
        let handle = self.thread.take()?;
        match handle.join() {
            Ok(state) => Some(state),
            Err(_) => {
                error!("Simulation thread panicked");
                None
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// loop thread body
fn run(
    world: World,
    mut state: MotionState,
    shared: Arc<Shared>,
    interval: Duration,
    stop_rx: Receiver<()>,
) -> MotionState {
    let ticker = channel::tick(interval);
    let behind = interval * BEHIND_WARN_INTERVALS;

    loop {
        select! {
            recv(ticker) -> scheduled => {
                if let Ok(scheduled) = scheduled {
                    let lag = scheduled.elapsed();
                    if lag > behind {
                        warn!("Simulation running {lag:?} behind schedule");
                    }
                }
                let input = TickInput {
                    joystick: shared.pending.take(),
                };
                tick(&mut state, &input, &world, SIM_DT);
                shared.snapshot.store(state.snapshot());
            }
            recv(stop_rx) -> _ => break,
        }
    }

    info!(
        "Session stopped after {} ticks at ({:.1}, {:.1})",
        state.time_ticks, state.pos.x, state.pos.y
    );
    state
}
