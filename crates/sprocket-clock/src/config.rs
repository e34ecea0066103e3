//! Serializable description of a pacing strategy.
//!
//! [`PacingConfig`] lets the strategy be chosen from a settings file instead of
//! in code:
//!
//! ```
//! use sprocket_clock::config::PacingConfig;
//!
//! let config: PacingConfig =
//!     serde_json::from_str(r#"{ "kind": "smooth", "factor": 1.5 }"#).unwrap();
//! assert_eq!(config, PacingConfig::Smooth { factor: 1.5 });
//! let strategy = config.build().unwrap();
//! # drop(strategy);
//! ```

use serde::{Deserialize, Serialize};

use crate::pacing::{
    MonotonicTimeSource, PacingStrategy, Passthrough, Peg, SleepIfNeeded, Smooth, TimeSource,
};
use crate::ClockError;

/// Which [`PacingStrategy`] to build, and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PacingConfig {
    /// [`Passthrough`]: game time follows wall time.
    #[default]
    Passthrough,
    /// [`Smooth`]: deltas pegged within `factor` of the running mean.
    Smooth {
        /// Multiplicative bound, `>= 1.0`.
        factor: f64,
    },
    /// [`Peg`]: deltas clamped into `[low_nanos, high_nanos]`.
    Peg {
        /// Smallest delta game time may observe.
        low_nanos: i64,
        /// Largest delta game time may observe.
        high_nanos: i64,
    },
    /// [`SleepIfNeeded`]: wall-time reads held at least one frame apart.
    SleepIfNeeded {
        /// Frame-rate cap.
        target_fps: f64,
    },
}

impl PacingConfig {
    /// Check the parameters without building anything.
    pub fn validate(&self) -> Result<(), ClockError> {
        let reason = match *self {
            Self::Passthrough => return Ok(()),
            Self::Smooth { factor } if !(factor.is_finite() && factor >= 1.0) => {
                format!("smoothing factor must be finite and >= 1.0, got {factor}")
            }
            Self::Peg {
                low_nanos,
                high_nanos,
            } if low_nanos > high_nanos => {
                format!("peg bounds inverted: low {low_nanos} > high {high_nanos}")
            }
            Self::SleepIfNeeded { target_fps } if !(target_fps.is_finite() && target_fps > 0.0) => {
                format!("target frame rate must be positive and finite, got {target_fps}")
            }
            _ => return Ok(()),
        };
        Err(ClockError::InvalidPacing { reason })
    }

    /// Build the strategy over the process monotonic clock.
    pub fn build(&self) -> Result<Box<dyn PacingStrategy>, ClockError> {
        self.build_with_source(MonotonicTimeSource::new())
    }

    /// Build the strategy over a specific time source.
    pub fn build_with_source<S>(&self, source: S) -> Result<Box<dyn PacingStrategy>, ClockError>
    where
        S: TimeSource + 'static,
    {
        self.validate()?;
        let strategy: Box<dyn PacingStrategy> = match *self {
            Self::Passthrough => Box::new(Passthrough::with_source(source)),
            Self::Smooth { factor } => Box::new(Smooth::with_source(factor, source)),
            Self::Peg {
                low_nanos,
                high_nanos,
            } => Box::new(Peg::with_source(low_nanos, high_nanos, source)),
            Self::SleepIfNeeded { target_fps } => {
                Box::new(SleepIfNeeded::with_source(target_fps, source))
            }
        };
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::pacing::ManualTimeSource;

    #[test]
    fn default_is_passthrough() {
        assert_eq!(PacingConfig::default(), PacingConfig::Passthrough);
    }

    #[test]
    fn parses_every_kind() {
        let cases = [
            (r#"{"kind":"passthrough"}"#, PacingConfig::Passthrough),
            (
                r#"{"kind":"peg","low_nanos":1,"high_nanos":2}"#,
                PacingConfig::Peg {
                    low_nanos: 1,
                    high_nanos: 2,
                },
            ),
            (
                r#"{"kind":"sleep_if_needed","target_fps":60.0}"#,
                PacingConfig::SleepIfNeeded { target_fps: 60.0 },
            ),
        ];
        for (json, expected) in cases {
            let parsed: PacingConfig = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn invalid_parameters_are_reported_not_panicked() {
        let err = PacingConfig::Smooth { factor: 0.2 }.build().err().unwrap();
        assert!(matches!(err, ClockError::InvalidPacing { .. }));
        assert!(PacingConfig::Peg {
            low_nanos: 5,
            high_nanos: 1
        }
        .validate()
        .is_err());
        assert!(PacingConfig::SleepIfNeeded { target_fps: -1.0 }
            .validate()
            .is_err());
    }

    #[test]
    fn built_strategy_drives_a_clock() {
        let source = ManualTimeSource::new();
        let strategy = PacingConfig::Peg {
            low_nanos: 0,
            high_nanos: 100,
        }
        .build_with_source(source.clone())
        .unwrap();

        let mut clock = GameClock::new();
        clock.set_time_manager(strategy);
        clock.begin();
        source.advance(250);
        clock.tick();
        assert_eq!(clock.delta_game_time(), 100);
    }
}
