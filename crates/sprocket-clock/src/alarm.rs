//! Game-time alarms.
//!
//! An [`Alarm`] stores only its delay and the absolute game time at which it
//! rings. Every query takes the clock and compares against its *current* game
//! time, so an alarm set for two seconds from now is pushed back by however
//! long the game spends paused.

use serde::{Deserialize, Serialize};

use crate::clock::GameClock;

/// A one-shot, resettable timer keyed to game time.
///
/// Created with [`GameClock::set_alarm`] or [`GameClock::sentinel_alarm`].
/// Once expired, an alarm stays expired until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alarm {
    delay_period: i64,
    alarm_time: i64,
    /// Game time at which the alarm was set or last reset.
    set_at: i64,
}

impl Alarm {
    pub(crate) fn starting_at(now: i64, delay_from_now: i64) -> Self {
        Self {
            delay_period: delay_from_now,
            alarm_time: now.saturating_add(delay_from_now),
            set_at: now,
        }
    }

    /// `true` once the clock's game time has reached the alarm time.
    pub fn expired<P>(&self, clock: &GameClock<P>) -> bool {
        clock.game_time() >= self.alarm_time
    }

    /// Re-arm with the same delay, counted from the clock's current game time.
    pub fn reset<P>(&mut self, clock: &GameClock<P>) {
        self.set_at = clock.game_time();
        self.alarm_time = self.set_at.saturating_add(self.delay_period);
    }

    /// Re-arm with `new_delay`, counted from the clock's current game time.
    pub fn reset_with<P>(&mut self, clock: &GameClock<P>, new_delay: i64) {
        self.delay_period = new_delay;
        self.reset(clock);
    }

    /// Game time elapsed since the alarm was set or last reset.
    pub fn elapsed_time<P>(&self, clock: &GameClock<P>) -> i64 {
        clock.game_time().saturating_sub(self.set_at)
    }

    /// Game time left before the alarm rings (negative once overdue).
    pub fn remaining_time<P>(&self, clock: &GameClock<P>) -> i64 {
        self.alarm_time.saturating_sub(clock.game_time())
    }

    /// The delay the alarm was (re)armed with.
    pub fn delay_period(&self) -> i64 {
        self.delay_period
    }

    /// Absolute game time at which the alarm rings.
    pub fn alarm_time(&self) -> i64 {
        self.alarm_time
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn running_clock() -> (GameClock<Passthrough<ManualTimeSource>>, ManualTimeSource) {
        let source = ManualTimeSource::new();
        let mut clock = GameClock::new();
        clock.set_time_manager(Passthrough::with_source(source.clone()));
        clock.begin();
        (clock, source)
    }

    #[test]
    fn zero_delay_is_expired_immediately() {
        let (clock, _) = running_clock();
        assert!(clock.set_alarm(0).expired(&clock));
    }

    #[test]
    fn expires_exactly_at_alarm_time() {
        let (mut clock, source) = running_clock();
        let alarm = clock.set_alarm(100);
        source.advance(99);
        clock.tick();
        assert!(!alarm.expired(&clock));
        assert_eq!(alarm.remaining_time(&clock), 1);
        source.advance(1);
        clock.tick();
        assert!(alarm.expired(&clock));
        assert_eq!(alarm.remaining_time(&clock), 0);
    }

    #[test]
    fn reset_rebases_on_current_game_time() {
        let (mut clock, source) = running_clock();
        let mut alarm = clock.set_alarm(50);
        source.advance(80);
        clock.tick();
        assert!(alarm.expired(&clock));

        alarm.reset(&clock);
        assert!(!alarm.expired(&clock));
        assert_eq!(alarm.alarm_time(), 130);
        assert_eq!(alarm.elapsed_time(&clock), 0);
    }

    #[test]
    fn reset_with_substitutes_the_delay() {
        let (mut clock, source) = running_clock();
        let mut alarm = clock.set_alarm(50);
        source.advance(10);
        clock.tick();
        alarm.reset_with(&clock, 5);
        assert_eq!(alarm.delay_period(), 5);
        assert_eq!(alarm.alarm_time(), 15);
        source.advance(5);
        clock.tick();
        assert!(alarm.expired(&clock));
    }

    #[test]
    fn elapsed_and_remaining_track_game_time() {
        let (mut clock, source) = running_clock();
        let alarm = clock.set_alarm(40);
        source.advance(15);
        clock.tick();
        assert_eq!(alarm.elapsed_time(&clock), 15);
        assert_eq!(alarm.remaining_time(&clock), 25);
        source.advance(30);
        clock.tick();
        assert_eq!(alarm.remaining_time(&clock), -5);
    }

    #[test]
    fn saturated_alarm_still_tracks_elapsed_time() {
        let (mut clock, source) = running_clock();
        source.advance(100);
        clock.tick();
        let mut alarm = clock.set_alarm(i64::MAX);
        assert_eq!(alarm.alarm_time(), i64::MAX);
        assert_eq!(alarm.elapsed_time(&clock), 0);

        source.advance(40);
        clock.tick();
        assert_eq!(alarm.elapsed_time(&clock), 40);
        alarm.reset(&clock);
        assert_eq!(alarm.elapsed_time(&clock), 0);
        assert!(!alarm.expired(&clock));
    }

    #[test]
    fn never_sentinel_survives_reset() {
        let (mut clock, source) = running_clock();
        let mut never = clock.sentinel_alarm(false);
        source.advance(1_000);
        clock.tick();
        never.reset(&clock);
        assert_eq!(never.alarm_time(), i64::MAX);
        assert!(!never.expired(&clock));
    }
}
