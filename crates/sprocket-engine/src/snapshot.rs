//! Frame snapshots with BLAKE3 hashing.
//!
//! A [`FrameSnapshot`] records the observable simulation state after a frame:
//! frame number, game time, the carried sub-millisecond remainder, and the
//! kinematic state of every managed body. Its `hash` is a BLAKE3 digest of
//! that state, so two runs fed the same inputs can be compared with a single
//! string equality.
//!
//! Snapshots are for inspection and determinism checks only. Bodies are
//! application types behind trait objects, so there is no restore.

use serde::{Deserialize, Serialize};
use sprocket_physics::body::BodyState;

use crate::driver::FrameDriver;
use crate::EngineError;

/// Observable state of a [`FrameDriver`] after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Game time in nanoseconds.
    pub game_time: i64,
    pub carried_nanos: i64,
    /// Body states grouped by layer, in registration order.
    pub layers: Vec<Vec<BodyState>>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the fields above.
    pub hash: String,
}

fn compute_hash(
    frame: u64,
    game_time: i64,
    carried_nanos: i64,
    layers: &[Vec<BodyState>],
) -> Result<String, EngineError> {
    #[derive(Serialize)]
    struct HashableState<'a> {
        frame: u64,
        game_time: i64,
        carried_nanos: i64,
        layers: &'a [Vec<BodyState>],
    }

    let bytes = serde_json::to_vec(&HashableState {
        frame,
        game_time,
        carried_nanos,
        layers,
    })?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

impl FrameSnapshot {
    /// Recompute the digest and compare it with the stored one.
    pub fn verify(&self) -> Result<bool, EngineError> {
        let hash = compute_hash(self.frame, self.game_time, self.carried_nanos, &self.layers)?;
        Ok(hash == self.hash)
    }
}

impl<P> FrameDriver<P> {
    /// Capture the current frame's state.
    pub fn capture_snapshot(&self) -> Result<FrameSnapshot, EngineError> {
        let layers = self.physics().body_states()?;
        let frame = self.frame_count();
        let game_time = self.clock().game_time();
        let carried_nanos = self.carried_nanos();
        let hash = compute_hash(frame, game_time, carried_nanos, &layers)?;
        Ok(FrameSnapshot {
            frame,
            game_time,
            carried_nanos,
            layers,
            hash,
        })
    }

    /// BLAKE3 digest of the current frame's state.
    pub fn state_hash(&self) -> Result<String, EngineError> {
        Ok(self.capture_snapshot()?.hash)
    }
}
