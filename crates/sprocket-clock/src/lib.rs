//! Sprocket Clock -- Game time with pause/resume, pacing strategies and alarms.
//!
//! This crate provides the time source for the Sprocket simulation core. A
//! [`GameClock`](clock::GameClock) distinguishes *wall time* (real elapsed time,
//! as read by a [`PacingStrategy`](pacing::PacingStrategy)) from *game time* (derived from wall time, but frozen while
//! paused and optionally coerced by the strategy).
//!
//! Time only advances when [`GameClock::tick`](clock::GameClock::tick) is called, so every observer in a
//! frame sees the same game time and the same delta.
//!
//! # Quick Start
//!
//! ```
//! use sprocket_clock::prelude::*;
//!
//! let source = ManualTimeSource::new();
//! let mut clock = GameClock::new();
//! clock.set_time_manager(Passthrough::with_source(source.clone()));
//! clock.begin();
//!
//! let alarm = clock.set_alarm(20 * NANOS_PER_MS);
//!
//! source.advance(16 * NANOS_PER_MS);
//! clock.tick();
//! assert_eq!(clock.delta_game_time(), 16 * NANOS_PER_MS);
//! assert!(!alarm.expired(&clock));
//!
//! source.advance(16 * NANOS_PER_MS);
//! clock.tick();
//! assert!(alarm.expired(&clock));
//! ```

#![deny(unsafe_code)]

pub mod alarm;
pub mod clock;
pub mod config;
pub mod pacing;

// ---------------------------------------------------------------------------
// Time units
// ---------------------------------------------------------------------------

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Microseconds in one second.
pub const US_PER_SECOND: i64 = 1_000_000;

/// Milliseconds in one second.
pub const MS_PER_SECOND: i64 = 1_000;

/// Nanoseconds in one millisecond.
pub const NANOS_PER_MS: i64 = NANOS_PER_SECOND / MS_PER_SECOND;

/// Frames per second implied by a frame period of `nanos` nanoseconds.
///
/// Returns `0` for non-positive periods.
pub fn frame_rate_from_nanos(nanos: i64) -> i64 {
    if nanos <= 0 {
        return 0;
    }
    NANOS_PER_SECOND / nanos
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by clock operations.
///
/// Sequencing violations on a [`GameClock`](clock::GameClock) are programmer
/// errors. The plain clock operations panic with the
/// error's message; the `try_*` variants hand the error back instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// `set_time_manager` was called after `begin`.
    #[error("cannot reset the time manager after the clock is started")]
    StrategyAlreadySet,

    /// `begin` was called before a pacing strategy was installed.
    #[error("cannot begin the clock until a time manager is set")]
    NoStrategy,

    /// `tick`, `pause` or `resume` was called before `begin`.
    #[error("cannot {operation} the clock before begin() is called")]
    NotStarted {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A [`PacingConfig`](config::PacingConfig) describes an impossible strategy.
    #[error("invalid pacing configuration: {reason}")]
    InvalidPacing {
        /// What is wrong with the configuration.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::alarm::Alarm;
    pub use crate::clock::{ClockState, GameClock};
    pub use crate::config::PacingConfig;
    pub use crate::pacing::{
        ManualTimeSource, MonotonicTimeSource, Passthrough, PacingStrategy, Peg, SleepIfNeeded,
        Smooth, TimeSource,
    };
    pub use crate::{
        frame_rate_from_nanos, ClockError, MS_PER_SECOND, NANOS_PER_MS, NANOS_PER_SECOND,
        US_PER_SECOND,
    };
}
