//! Engine configuration and logging setup.
//!
//! ```
//! use sprocket_engine::config::EngineConfig;
//! use sprocket_engine::prelude::PacingConfig;
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "pacing": { "kind": "sleep_if_needed", "target_fps": 60.0 } }"#,
//! ).unwrap();
//! assert_eq!(config.pacing, PacingConfig::SleepIfNeeded { target_fps: 60.0 });
//! assert_eq!(config.log_filter, "warn");
//! ```

use serde::{Deserialize, Serialize};
use sprocket_clock::config::PacingConfig;
use sprocket_clock::pacing::{PacingStrategy, TimeSource};
use sprocket_physics::rectangle::RectangleTolerances;
use tracing_subscriber::EnvFilter;

use crate::driver::FrameDriver;
use crate::EngineError;

/// Everything needed to assemble a [`FrameDriver`].
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How the clock paces and coerces frame deltas.
    pub pacing: PacingConfig,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Contact tolerances for rectangle bodies built by the application.
    pub tolerances: RectangleTolerances,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            log_filter: "warn".to_owned(),
            tolerances: RectangleTolerances::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.pacing.validate()?;
        Ok(config)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a driver paced against the process monotonic clock.
    pub fn build_driver(&self) -> Result<FrameDriver<Box<dyn PacingStrategy>>, EngineError> {
        Ok(FrameDriver::new(self.pacing.build()?))
    }

    /// Build a driver paced against `source`.
    pub fn build_driver_with_source<S>(
        &self,
        source: S,
    ) -> Result<FrameDriver<Box<dyn PacingStrategy>>, EngineError>
    where
        S: TimeSource + 'static,
    {
        Ok(FrameDriver::new(self.pacing.build_with_source(source)?))
    }
}

/// Install a global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `default_filter`.
/// Returns `false` if a global subscriber was already installed; calling this
/// more than once is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
