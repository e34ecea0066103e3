//! The frame loop: clock tick, millisecond conversion, systems, physics.
//!
//! Game time is measured in nanoseconds but bodies are updated in whole
//! milliseconds. A fast frame may last well under a millisecond, so naive
//! truncation would stall the simulation at zero. The driver instead carries
//! the remainder:
//!
//! ```text
//! total      = delta_game_time + carried
//! delta_ms   = total / NANOS_PER_MS
//! carried    = total % NANOS_PER_MS
//! ```
//!
//! Summed over any run, `delta_ms * NANOS_PER_MS + carried` equals the game
//! time elapsed, so no game time is ever lost.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sprocket_clock::clock::GameClock;
use sprocket_clock::pacing::PacingStrategy;
use sprocket_clock::NANOS_PER_MS;
use sprocket_physics::engine::VanillaPhysicsEngine;
use tracing::{debug, info, trace};

use crate::EngineError;

// ---------------------------------------------------------------------------
// FrameReport
// ---------------------------------------------------------------------------

/// Diagnostics for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// 1-based frame number.
    pub frame: u64,
    /// Game-time delta reported by the clock, in nanoseconds.
    pub delta_game_nanos: i64,
    /// Milliseconds handed to systems and the physics step.
    pub delta_ms: i64,
    /// Sub-millisecond remainder carried into the next frame.
    pub carried_nanos: i64,
    /// Bodies integrated by the physics step.
    pub bodies_updated: usize,
    /// Overlapping pairs handed to collision rules.
    pub collisions: usize,
    /// Wall-clock time spent inside [`FrameDriver::step`].
    pub step_time: Duration,
}

// ---------------------------------------------------------------------------
// Frame systems
// ---------------------------------------------------------------------------

/// Game logic run once per frame, before physics.
///
/// Receives the frame's millisecond delta and the clock (for alarms and
/// game time). Systems reach their bodies through layer handles they
/// captured when registered.
pub type FrameSystem<P> = Box<dyn FnMut(i64, &GameClock<P>) -> anyhow::Result<()>>;

struct RegisteredSystem<P> {
    name: String,
    func: FrameSystem<P>,
}

// ---------------------------------------------------------------------------
// FrameDriver
// ---------------------------------------------------------------------------

/// Owns a [`GameClock`] and a [`VanillaPhysicsEngine`] and steps them
/// together.
pub struct FrameDriver<P> {
    clock: GameClock<P>,
    physics: VanillaPhysicsEngine,
    systems: Vec<RegisteredSystem<P>>,
    carried_nanos: i64,
    frame_count: u64,
    last_report: FrameReport,
}

impl<P: PacingStrategy> FrameDriver<P> {
    /// A driver whose clock is paced by `strategy`. Call
    /// [`start`](Self::start) before the first [`step`](Self::step).
    pub fn new(strategy: P) -> Self {
        let mut clock = GameClock::new();
        clock.set_time_manager(strategy);
        Self::from_clock(clock)
    }

    /// Wrap an existing clock, which may already be running.
    pub fn from_clock(clock: GameClock<P>) -> Self {
        Self {
            clock,
            physics: VanillaPhysicsEngine::new(),
            systems: Vec::new(),
            carried_nanos: 0,
            frame_count: 0,
            last_report: FrameReport::default(),
        }
    }

    /// Register a frame system. Systems run in registration order.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system<F>(&mut self, name: &str, func: F)
    where
        F: FnMut(i64, &GameClock<P>) -> anyhow::Result<()> + 'static,
    {
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func: Box::new(func),
        });
        debug!(system = name, "frame system registered");
    }

    /// Begin the clock and reset frame bookkeeping.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.clock.try_begin()?;
        self.carried_nanos = 0;
        self.frame_count = 0;
        self.last_report = FrameReport::default();
        info!(systems = self.systems.len(), "frame driver started");
        Ok(())
    }

    /// Run one frame.
    ///
    /// A failing system stops the frame before physics runs; the clock has
    /// already ticked and the carried remainder is kept.
    pub fn step(&mut self) -> Result<FrameReport, EngineError> {
        let started = Instant::now();
        self.clock.try_tick()?;

        let delta_game_nanos = self.clock.delta_game_time();
        let total = delta_game_nanos + self.carried_nanos;
        let delta_ms = total / NANOS_PER_MS;
        self.carried_nanos = total % NANOS_PER_MS;
        self.frame_count += 1;

        for system in &mut self.systems {
            (system.func)(delta_ms, &self.clock).map_err(|source| EngineError::System {
                name: system.name.clone(),
                source,
            })?;
        }

        let physics = self.physics.apply_laws_of_physics(delta_ms)?;

        let report = FrameReport {
            frame: self.frame_count,
            delta_game_nanos,
            delta_ms,
            carried_nanos: self.carried_nanos,
            bodies_updated: physics.bodies_updated,
            collisions: physics.scan.collisions,
            step_time: started.elapsed(),
        };
        trace!(
            frame = report.frame,
            delta_ms,
            carried = report.carried_nanos,
            collisions = report.collisions,
            "frame complete"
        );
        self.last_report = report;
        Ok(report)
    }

    /// Run `n` frames, stopping at the first error.
    pub fn run_frames(&mut self, n: u64) -> Result<Vec<FrameReport>, EngineError> {
        (0..n).map(|_| self.step()).collect()
    }
}

impl<P> FrameDriver<P> {
    /// Request a pause; see [`GameClock::try_pause`].
    pub fn pause(&mut self) -> Result<(), EngineError> {
        Ok(self.clock.try_pause()?)
    }

    /// Request a resume; see [`GameClock::try_resume`].
    pub fn resume(&mut self) -> Result<(), EngineError> {
        Ok(self.clock.try_resume()?)
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn clock(&self) -> &GameClock<P> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut GameClock<P> {
        &mut self.clock
    }

    pub fn physics(&self) -> &VanillaPhysicsEngine {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut VanillaPhysicsEngine {
        &mut self.physics
    }

    /// Frames stepped since [`start`](FrameDriver::start).
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Game time not yet handed out as whole milliseconds.
    pub fn carried_nanos(&self) -> i64 {
        self.carried_nanos
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }
}
