//! The game clock: a tick-quantised time source with pause/resume.
//!
//! Time advances only in [`GameClock::tick`]. Each tick reads the wall time
//! through the installed [`PacingStrategy`], coerces the wall delta, and then
//! decides how much of it game time sees based on the clock state:
//!
//! | state      | `delta_game_time`        | next state |
//! |------------|--------------------------|------------|
//! | `Running`  | coerced delta            | `Running`  |
//! | `Pausing`  | `0` (coerced delta kept) | `Paused`   |
//! | `Paused`   | `0`                      | `Paused`   |
//! | `Resuming` | the delta kept on pause  | `Running`  |
//!
//! The delta measured on the pausing tick is replayed on the resuming tick, so
//! exactly one frame's worth of game time survives a pause/resume cycle.
//!
//! Sequencing mistakes (ticking before [`begin`](GameClock::begin), replacing
//! the strategy after start, ...) are programmer errors: the plain methods
//! panic, the `try_*` methods return a [`ClockError`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alarm::Alarm;
use crate::pacing::PacingStrategy;
use crate::ClockError;

// ---------------------------------------------------------------------------
// ClockState
// ---------------------------------------------------------------------------

/// Internal state of a [`GameClock`].
///
/// Outside observers usually only care whether the clock is paused; see
/// [`GameClock::is_paused`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockState {
    /// Constructed, [`GameClock::begin`] not yet called.
    NotStarted,
    /// Game time follows (coerced) wall time.
    Running,
    /// Pause requested; takes effect on the next tick.
    Pausing,
    /// Game time is frozen.
    Paused,
    /// Resume requested; takes effect on the next tick.
    Resuming,
}

// ---------------------------------------------------------------------------
// GameClock
// ---------------------------------------------------------------------------

/// Wall time and game time for one simulation.
///
/// All times are in nanoseconds. A clock is an ordinary value: construct one,
/// install a strategy with [`set_time_manager`](Self::set_time_manager), call
/// [`begin`](Self::begin), then [`tick`](Self::tick) once per frame. Tests are
/// free to run several independent clocks side by side.
#[derive(Debug)]
pub struct GameClock<P> {
    strategy: Option<P>,
    state: ClockState,
    wall_time: i64,
    game_time: i64,
    delta_wall_time: i64,
    delta_game_time: i64,
    /// Coerced delta captured on the pausing tick, replayed on resume.
    delta_on_pause_begin: i64,
}

impl<P> Default for GameClock<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> GameClock<P> {
    /// A clock in the `NotStarted` state with no strategy.
    pub fn new() -> Self {
        Self {
            strategy: None,
            state: ClockState::NotStarted,
            wall_time: 0,
            game_time: 0,
            delta_wall_time: 0,
            delta_game_time: 0,
            delta_on_pause_begin: 0,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Current state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// `true` while paused, including the tick on which a resume is pending.
    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused | ClockState::Resuming)
    }

    /// Whether a pacing strategy has been installed.
    pub fn has_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    /// Accumulated game time.
    pub fn game_time(&self) -> i64 {
        self.game_time
    }

    /// Absolute wall time as of the last read.
    pub fn wall_time(&self) -> i64 {
        self.wall_time
    }

    /// Game time added by the last tick.
    pub fn delta_game_time(&self) -> i64 {
        self.delta_game_time
    }

    /// Wall time elapsed between the last two reads.
    pub fn delta_wall_time(&self) -> i64 {
        self.delta_wall_time
    }

    /// The installed strategy.
    pub fn pacing(&self) -> Option<&P> {
        self.strategy.as_ref()
    }

    /// Mutable access to the installed strategy, e.g. to retune
    /// [`SleepIfNeeded`](crate::pacing::SleepIfNeeded) while running.
    pub fn pacing_mut(&mut self) -> Option<&mut P> {
        self.strategy.as_mut()
    }

    // -- alarms -------------------------------------------------------------

    /// An alarm that expires `delay_from_now` nanoseconds of game time from now.
    pub fn set_alarm(&self, delay_from_now: i64) -> Alarm {
        Alarm::starting_at(self.game_time, delay_from_now)
    }

    /// An alarm that is already expired (`true`) or will effectively never
    /// expire (`false`).
    pub fn sentinel_alarm(&self, expired: bool) -> Alarm {
        if expired {
            self.set_alarm(0)
        } else {
            let delay = i64::MAX.saturating_sub(self.game_time).saturating_sub(1);
            self.set_alarm(delay)
        }
    }

    // -- pause / resume -----------------------------------------------------

    /// Request a pause.
    ///
    /// From `Running` the pause takes effect on the next tick. A pause that
    /// arrives while a resume is still pending cancels the resume.
    pub fn try_pause(&mut self) -> Result<(), ClockError> {
        let next = match self.state {
            ClockState::Running => ClockState::Pausing,
            ClockState::Resuming => ClockState::Paused,
            ClockState::NotStarted => return Err(ClockError::NotStarted { operation: "pause" }),
            ClockState::Pausing | ClockState::Paused => return Ok(()),
        };
        debug!(from = ?self.state, to = ?next, "clock pause requested");
        self.state = next;
        Ok(())
    }

    /// Request a resume.
    ///
    /// From `Paused` the resume takes effect on the next tick. A resume that
    /// arrives while a pause is still pending cancels the pause.
    pub fn try_resume(&mut self) -> Result<(), ClockError> {
        let next = match self.state {
            ClockState::Pausing => ClockState::Running,
            ClockState::Paused => ClockState::Resuming,
            ClockState::NotStarted => {
                return Err(ClockError::NotStarted {
                    operation: "resume",
                })
            }
            ClockState::Running | ClockState::Resuming => return Ok(()),
        };
        debug!(from = ?self.state, to = ?next, "clock resume requested");
        self.state = next;
        Ok(())
    }

    /// Like [`try_pause`](Self::try_pause).
    ///
    /// # Panics
    ///
    /// Panics if the clock has not begun.
    pub fn pause(&mut self) {
        if let Err(e) = self.try_pause() {
            panic!("{e}");
        }
    }

    /// Like [`try_resume`](Self::try_resume).
    ///
    /// # Panics
    ///
    /// Panics if the clock has not begun.
    pub fn resume(&mut self) {
        if let Err(e) = self.try_resume() {
            panic!("{e}");
        }
    }
}

impl<P: PacingStrategy> GameClock<P> {
    /// Install the pacing strategy and take the wall-time origin from it.
    ///
    /// Only legal before [`begin`](Self::begin).
    pub fn try_set_time_manager(&mut self, strategy: P) -> Result<(), ClockError> {
        if self.state != ClockState::NotStarted {
            return Err(ClockError::StrategyAlreadySet);
        }
        let strategy = self.strategy.insert(strategy);
        self.wall_time = strategy.absolute_wall_time(None);
        self.game_time = 0;
        info!(wall_time = self.wall_time, "clock time manager installed");
        Ok(())
    }

    /// Start the clock: game time restarts at zero, wall time is re-read.
    pub fn try_begin(&mut self) -> Result<(), ClockError> {
        let strategy = self.strategy.as_mut().ok_or(ClockError::NoStrategy)?;
        self.wall_time = strategy.absolute_wall_time(None);
        self.game_time = 0;
        self.delta_wall_time = 0;
        self.delta_game_time = 0;
        self.state = ClockState::Running;
        info!(wall_time = self.wall_time, "clock started");
        Ok(())
    }

    /// Advance the clock by one frame.
    pub fn try_tick(&mut self) -> Result<(), ClockError> {
        if self.state == ClockState::NotStarted {
            return Err(ClockError::NotStarted { operation: "tick" });
        }
        let strategy = self.strategy.as_mut().ok_or(ClockError::NoStrategy)?;

        // Wall time always moves, whatever the pause state.
        let now = strategy.absolute_wall_time(Some(self.wall_time));
        self.delta_wall_time = now - self.wall_time;
        self.wall_time = now;
        let coerced = strategy.coerce_delta_time(self.delta_wall_time);

        match self.state {
            ClockState::Running => {
                self.delta_game_time = coerced;
            }
            ClockState::Pausing => {
                self.delta_on_pause_begin = coerced;
                self.delta_game_time = 0;
                self.state = ClockState::Paused;
                debug!(frozen_delta = coerced, "clock paused");
            }
            ClockState::Resuming => {
                self.delta_game_time = self.delta_on_pause_begin;
                self.state = ClockState::Running;
                debug!(replayed_delta = self.delta_on_pause_begin, "clock resumed");
            }
            ClockState::Paused => {
                self.delta_game_time = 0;
            }
            ClockState::NotStarted => unreachable!("checked above"),
        }

        self.game_time += self.delta_game_time;
        Ok(())
    }

    /// Like [`try_set_time_manager`](Self::try_set_time_manager).
    ///
    /// # Panics
    ///
    /// Panics if the clock has already begun.
    pub fn set_time_manager(&mut self, strategy: P) {
        if let Err(e) = self.try_set_time_manager(strategy) {
            panic!("{e}");
        }
    }

    /// Like [`try_begin`](Self::try_begin).
    ///
    /// # Panics
    ///
    /// Panics if no strategy is installed.
    pub fn begin(&mut self) {
        if let Err(e) = self.try_begin() {
            panic!("{e}");
        }
    }

    /// Like [`try_tick`](Self::try_tick).
    ///
    /// # Panics
    ///
    /// Panics if the clock has not begun.
    pub fn tick(&mut self) {
        if let Err(e) = self.try_tick() {
            panic!("{e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
