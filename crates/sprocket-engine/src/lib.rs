//! Sprocket Engine -- Frame driver tying the game clock to the physics step.
//!
//! Each frame, the [`FrameDriver`](driver::FrameDriver):
//!
//! 1. ticks the [`GameClock`](sprocket_clock::clock::GameClock),
//! 2. converts the game-time delta to whole milliseconds, carrying the
//!    sub-millisecond remainder into the next frame,
//! 3. runs the registered frame systems (game logic) in registration order,
//! 4. applies one physics step with that millisecond delta.
//!
//! Settings come from an [`EngineConfig`](config::EngineConfig), typically
//! parsed from JSON, and logging goes through `tracing`
//! ([`init_tracing`](config::init_tracing) installs a subscriber).
//!
//! # Quick Start
//!
//! ```
//! use sprocket_engine::prelude::*;
//!
//! let source = ManualTimeSource::new();
//! let mut driver = FrameDriver::new(Passthrough::with_source(source.clone()));
//!
//! let mut layer = BodyLayer::iterative_update();
//! let mut ball = KinematicBody::new(Vector2D::ZERO, 4.0, 4.0);
//! ball.set_velocity(Vector2D::new(0.5, 0.0));
//! layer.add(ball);
//! let balls = driver.physics_mut().manage_new_layer(layer);
//!
//! driver.start()?;
//! source.advance(10 * NANOS_PER_MS);
//! let report = driver.step()?;
//! assert_eq!(report.delta_ms, 10);
//! assert_eq!(balls.borrow().get(0).unwrap().position().x, 5.0);
//! # Ok::<(), EngineError>(())
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod driver;
pub mod snapshot;

use sprocket_clock::ClockError;
use sprocket_physics::PhysicsError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring or driving frames.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The clock was driven out of sequence.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// The physics step failed.
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// A configuration document could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A frame system returned an error; the frame's physics step did not run.
    #[error("frame system `{name}` failed: {source}")]
    System {
        /// System name.
        name: String,
        /// The system's error.
        source: anyhow::Error,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage, including the clock and physics
/// preludes.
pub mod prelude {
    pub use crate::config::{init_tracing, EngineConfig};
    pub use crate::driver::{FrameDriver, FrameReport};
    pub use crate::snapshot::FrameSnapshot;
    pub use crate::EngineError;
    pub use sprocket_clock::prelude::*;
    pub use sprocket_physics::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_errors_pass_through_transparently() {
        let err: EngineError = ClockError::NoStrategy.into();
        assert_eq!(err.to_string(), ClockError::NoStrategy.to_string());
    }

    #[test]
    fn config_errors_are_labelled() {
        let parse = serde_json::from_str::<serde_json::Value>("{").err().unwrap();
        let err: EngineError = parse.into();
        assert!(err.to_string().starts_with("invalid engine configuration:"));
    }
}
