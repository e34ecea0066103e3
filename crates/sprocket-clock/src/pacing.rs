//! Pacing strategies: how wall time is read and how its passage is coerced.
//!
//! A [`PacingStrategy`] has two jobs, mirroring the two halves of
//! [`GameClock::tick`](crate::clock::GameClock::tick):
//!
//! 1. [`absolute_wall_time`](PacingStrategy::absolute_wall_time) reads the
//!    monotonic wall time. A strategy may block here to cap the frame rate
//!    ([`SleepIfNeeded`]).
//! 2. [`coerce_delta_time`](PacingStrategy::coerce_delta_time) turns the measured
//!    wall delta into the delta that game time will observe ([`Smooth`],
//!    [`Peg`]), or passes it through untouched ([`Passthrough`]).
//!
//! Every strategy reads time through a [`TimeSource`]. Production code uses
//! [`MonotonicTimeSource`]; tests use [`ManualTimeSource`], whose clock only
//! moves when told to and whose `sleep` advances it instead of blocking.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::NANOS_PER_SECOND;

/// Number of samples the [`Smooth`] running mean is bounded to.
pub const SMOOTH_WINDOW: i64 = 1000;

// ---------------------------------------------------------------------------
// TimeSource
// ---------------------------------------------------------------------------

/// A monotonic nanosecond counter that strategies read wall time from.
pub trait TimeSource {
    /// Current monotonic time in nanoseconds.
    fn now_nanos(&self) -> i64;

    /// Block the calling thread for roughly `duration`.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Wall time measured from an [`Instant`] captured at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: Instant,
}

impl MonotonicTimeSource {
    /// Create a source whose zero is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now_nanos(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// A hand-driven time source for deterministic tests and replays.
///
/// Clones share the same counter, so a test can keep one handle and give
/// another to the strategy under test.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<i64>>,
}

impl ManualTimeSource {
    /// A source starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A source starting at `nanos`.
    pub fn starting_at(nanos: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(nanos)),
        }
    }

    /// Move time forward by `nanos`.
    pub fn advance(&self, nanos: i64) {
        self.now.set(self.now.get() + nanos);
    }

    /// Jump to an absolute time.
    pub fn set(&self, nanos: i64) {
        self.now.set(nanos);
    }

    /// Current time in nanoseconds.
    pub fn now(&self) -> i64 {
        self.now.get()
    }
}

impl TimeSource for ManualTimeSource {
    fn now_nanos(&self) -> i64 {
        self.now.get()
    }

    /// Sleeping on a manual source advances it by exactly `duration`.
    fn sleep(&self, duration: Duration) {
        self.advance(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX));
    }
}

// ---------------------------------------------------------------------------
// PacingStrategy
// ---------------------------------------------------------------------------

/// Reads wall time and coerces its passage into game time.
pub trait PacingStrategy {
    /// Read the absolute wall time in nanoseconds.
    ///
    /// `last_absolute` is the value returned by the previous read, or `None`
    /// when the clock is (re)establishing its origin.
    fn absolute_wall_time(&mut self, last_absolute: Option<i64>) -> i64;

    /// Map the measured wall delta to the delta game time should observe.
    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64;
}

impl<P: PacingStrategy + ?Sized> PacingStrategy for Box<P> {
    fn absolute_wall_time(&mut self, last_absolute: Option<i64>) -> i64 {
        (**self).absolute_wall_time(last_absolute)
    }

    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64 {
        (**self).coerce_delta_time(delta_wall)
    }
}

// ---------------------------------------------------------------------------
// Passthrough
// ---------------------------------------------------------------------------

/// Game time passes exactly as wall time does.
#[derive(Debug, Clone, Default)]
pub struct Passthrough<S = MonotonicTimeSource> {
    source: S,
}

impl Passthrough {
    /// Passthrough over the process monotonic clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TimeSource> Passthrough<S> {
    /// Passthrough over a specific time source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

impl<S: TimeSource> PacingStrategy for Passthrough<S> {
    fn absolute_wall_time(&mut self, _last_absolute: Option<i64>) -> i64 {
        self.source.now_nanos()
    }

    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64 {
        delta_wall
    }
}

// ---------------------------------------------------------------------------
// Smooth
// ---------------------------------------------------------------------------

/// Keeps a running mean of recent deltas and pegs each delta to within a
/// multiplicative `factor` of it.
///
/// The mean is bounded to [`SMOOTH_WINDOW`] samples: once the window is full,
/// one mean's worth is dropped from the total for every new sample.
#[derive(Debug, Clone)]
pub struct Smooth<S = MonotonicTimeSource> {
    source: S,
    factor: f64,
    total: i64,
    samples: i64,
}

impl Smooth {
    /// Smoothing over the process monotonic clock.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not finite or is less than `1.0`.
    pub fn new(factor: f64) -> Self {
        Self::with_source(factor, MonotonicTimeSource::new())
    }
}

impl<S: TimeSource> Smooth<S> {
    /// Smoothing over a specific time source.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not finite or is less than `1.0`.
    pub fn with_source(factor: f64, source: S) -> Self {
        assert!(
            factor.is_finite() && factor >= 1.0,
            "smoothing factor must be finite and >= 1.0, got {factor}"
        );
        Self {
            source,
            factor,
            total: 0,
            samples: 0,
        }
    }

    /// The configured factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Current running mean, or `None` before the first sample.
    pub fn mean(&self) -> Option<i64> {
        (self.samples > 0).then(|| self.total / self.samples)
    }

    /// Number of samples currently contributing to the mean.
    pub fn sample_count(&self) -> i64 {
        self.samples
    }
}

impl<S: TimeSource> PacingStrategy for Smooth<S> {
    fn absolute_wall_time(&mut self, _last_absolute: Option<i64>) -> i64 {
        self.source.now_nanos()
    }

    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64 {
        self.total += delta_wall;
        self.samples += 1;
        let avg = self.total / self.samples;
        let high = (self.factor * avg as f64) as i64;
        let low = (avg as f64 / self.factor) as i64;

        if self.samples > SMOOTH_WINDOW {
            self.samples = SMOOTH_WINDOW;
            self.total -= avg;
        }

        if delta_wall > high {
            trace!(delta_wall, high, "smooth pacing clamped delta down");
            high
        } else if delta_wall < low {
            trace!(delta_wall, low, "smooth pacing clamped delta up");
            low
        } else {
            delta_wall
        }
    }
}

// ---------------------------------------------------------------------------
// Peg
// ---------------------------------------------------------------------------

/// Pegs every delta into `[low, high]`.
#[derive(Debug, Clone)]
pub struct Peg<S = MonotonicTimeSource> {
    source: S,
    low: i64,
    high: i64,
}

impl Peg {
    /// Clamp over the process monotonic clock.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`.
    pub fn new(low: i64, high: i64) -> Self {
        Self::with_source(low, high, MonotonicTimeSource::new())
    }
}

impl<S: TimeSource> Peg<S> {
    /// Clamp over a specific time source.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`.
    pub fn with_source(low: i64, high: i64, source: S) -> Self {
        assert!(low <= high, "peg bounds inverted: low {low} > high {high}");
        Self { source, low, high }
    }

    /// The `(low, high)` bounds.
    pub fn bounds(&self) -> (i64, i64) {
        (self.low, self.high)
    }
}

impl<S: TimeSource> PacingStrategy for Peg<S> {
    fn absolute_wall_time(&mut self, _last_absolute: Option<i64>) -> i64 {
        self.source.now_nanos()
    }

    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64 {
        delta_wall.clamp(self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// SleepIfNeeded
// ---------------------------------------------------------------------------

/// Sleeps inside the wall-time read so that consecutive reads are at least
/// one target frame period apart.
///
/// This is the only place in the simulation core that blocks.
#[derive(Debug, Clone)]
pub struct SleepIfNeeded<S = MonotonicTimeSource> {
    source: S,
    desired_fps: f64,
    target_nanos: i64,
}

impl SleepIfNeeded {
    /// Rate cap over the process monotonic clock.
    ///
    /// # Panics
    ///
    /// Panics if `desired_fps` is not finite and positive.
    pub fn new(desired_fps: f64) -> Self {
        Self::with_source(desired_fps, MonotonicTimeSource::new())
    }
}

impl<S: TimeSource> SleepIfNeeded<S> {
    /// Rate cap over a specific time source.
    ///
    /// # Panics
    ///
    /// Panics if `desired_fps` is not finite and positive.
    pub fn with_source(desired_fps: f64, source: S) -> Self {
        let mut strategy = Self {
            source,
            desired_fps: 0.0,
            target_nanos: 0,
        };
        strategy.set_max_fps(desired_fps);
        strategy
    }

    /// Change the target rate. Takes effect on the next wall-time read.
    ///
    /// # Panics
    ///
    /// Panics if `desired_fps` is not finite and positive.
    pub fn set_max_fps(&mut self, desired_fps: f64) {
        assert!(
            desired_fps.is_finite() && desired_fps > 0.0,
            "target frame rate must be positive and finite, got {desired_fps}"
        );
        self.desired_fps = desired_fps;
        self.target_nanos = (NANOS_PER_SECOND as f64 / desired_fps) as i64;
    }

    /// The current target rate.
    pub fn max_fps(&self) -> f64 {
        self.desired_fps
    }

    /// Minimum spacing between wall-time reads, in nanoseconds.
    pub fn target_nanos(&self) -> i64 {
        self.target_nanos
    }
}

impl<S: TimeSource> PacingStrategy for SleepIfNeeded<S> {
    fn absolute_wall_time(&mut self, last_absolute: Option<i64>) -> i64 {
        let mut now = self.source.now_nanos();
        let Some(last) = last_absolute else {
            return now;
        };

        while now - last < self.target_nanos {
            let remaining = self.target_nanos - (now - last);
            trace!(remaining_nanos = remaining, "sleeping to hold frame rate");
            self.source.sleep(Duration::from_nanos(remaining as u64));
            now = self.source.now_nanos();
        }
        now
    }

    fn coerce_delta_time(&mut self, delta_wall: i64) -> i64 {
        delta_wall
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
