//! Cooperative countdown clock.
//!
//! Nothing runs in the background: the control loop calls [`Countdown::poll`]
//! and gets back how many one-second ticks fell due since the last call.

use std::time::{Duration, Instant};

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, Default)]
pub struct Countdown {
    next_due: Option<Instant>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking from `now`, superseding any previous schedule.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + TICK);
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that fell due up to `now`.
    ///
    /// Ticks that arrive late are all reported, so a blocked caller catches up.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += TICK;
        }
        self.next_due = Some(due);
        fired
    }

    /// Time until the next tick, if running.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_countdown_never_fires() {
        let mut countdown = Countdown::new();
        assert!(!countdown.is_running());
        assert_eq!(countdown.poll(Instant::now() + Duration::from_secs(60)), 0);
    }

    #[test]
    fn test_ticks_once_per_second() {
        let t0 = Instant::now();
        let mut countdown = Countdown::new();
        countdown.start(t0);

        assert_eq!(countdown.poll(t0 + Duration::from_millis(999)), 0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1000)), 1);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1500)), 0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(2000)), 1);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let t0 = Instant::now();
        let mut countdown = Countdown::new();
        countdown.start(t0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(5300)), 5);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(6000)), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let t0 = Instant::now();
        let mut countdown = Countdown::new();
        countdown.cancel();
        countdown.start(t0);
        countdown.cancel();
        countdown.cancel();
        assert!(!countdown.is_running());
        assert_eq!(countdown.poll(t0 + Duration::from_secs(10)), 0);
        assert_eq!(countdown.until_next(t0), None);
    }

    #[test]
    fn test_restart_supersedes_previous_schedule() {
        let t0 = Instant::now();
        let mut countdown = Countdown::new();
        countdown.start(t0);
        let t1 = t0 + Duration::from_millis(900);
        countdown.start(t1);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1200)), 0);
        assert_eq!(countdown.poll(t1 + Duration::from_secs(1)), 1);
    }

    #[test]
    fn test_until_next() {
        let t0 = Instant::now();
        let mut countdown = Countdown::new();
        countdown.start(t0);
        assert_eq!(countdown.until_next(t0), Some(TICK));
        assert_eq!(countdown.until_next(t0 + Duration::from_secs(3)), Some(Duration::ZERO));
    }
}
