//! Cancellable scheduled tasks driven by an explicit clock.
//!
//! Neither type owns a timer. Callers ask when the next run is due, sleep
//! however their runtime sleeps, then ask again. Tests drive them with
//! [`ManualClock`].

use std::cell::Cell;

use chrono::Utc;

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Virtual clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub const fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

/// Fixed-period polling task that can be started and stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTimer {
    interval_ms: i64,
    next_due_ms: Option<i64>,
}

impl PollTimer {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    /// Schedules the first tick one interval from `now_ms`.
    pub fn start(&mut self, now_ms: i64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Cancels any scheduled tick.
    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub const fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub const fn next_due_ms(&self) -> Option<i64> {
        self.next_due_ms
    }

    /// Returns true once per elapsed period and schedules the next tick.
    ///
    /// Missed periods collapse into one tick; the next one is a full interval
    /// after `now_ms`.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
                true
            }
            _ => false,
        }
    }
}

/// Delays a value until input has been quiet for `delay_ms`.
///
/// Scheduling a new value replaces the pending one instead of queuing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay_ms: i64,
    pending: Option<(i64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms: delay_ms.max(0),
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the delay.
    pub fn schedule(&mut self, now_ms: i64, value: T) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), value));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn due_ms(&self) -> Option<i64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Takes the pending value once its delay has elapsed.
    pub fn poll(&mut self, now_ms: i64) -> Option<T> {
        if self.due_ms().is_some_and(|due| now_ms >= due) {
            self.pending.take().map(|(_, value)| value)
        } else {
            None
        }
    }

    /// Takes the pending value immediately, due or not.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_timer_ticks_once_per_interval() {
        let clock = ManualClock::new(1_000);
        let mut timer = PollTimer::new(60_000);
        assert!(!timer.poll(clock.now_ms()), "stopped timer must not tick");

        timer.start(clock.now_ms());
        clock.advance(59_999);
        assert!(!timer.poll(clock.now_ms()));
        clock.advance(1);
        assert!(timer.poll(clock.now_ms()));
        assert!(!timer.poll(clock.now_ms()));

        clock.advance(600_000);
        assert!(timer.poll(clock.now_ms()), "missed ticks collapse into one");
        assert!(!timer.poll(clock.now_ms()));
    }

    #[test]
    fn stopped_timer_never_ticks() {
        let clock = ManualClock::new(0);
        let mut timer = PollTimer::new(10);
        timer.start(clock.now_ms());
        timer.stop();
        clock.advance(1_000);
        assert!(!timer.is_running());
        assert!(!timer.poll(clock.now_ms()));
    }

    #[test]
    fn debouncer_keeps_only_latest_value() {
        let clock = ManualClock::new(0);
        let mut debouncer = Debouncer::new(300);

        debouncer.schedule(clock.now_ms(), "m");
        clock.advance(200);
        debouncer.schedule(clock.now_ms(), "md");
        clock.advance(200);
        assert_eq!(debouncer.poll(clock.now_ms()), None);

        clock.advance(100);
        assert_eq!(debouncer.poll(clock.now_ms()), Some("md"));
        assert_eq!(debouncer.poll(clock.now_ms()), None);
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule(0, 1);
        debouncer.cancel();
        assert_eq!(debouncer.due_ms(), None);
        assert_eq!(debouncer.poll(100), None);
    }

    #[test]
    fn flush_skips_the_wait() {
        let mut debouncer = Debouncer::new(300);
        debouncer.schedule(0, "cutter");
        assert_eq!(debouncer.flush(), Some("cutter"));
        assert_eq!(debouncer.flush(), None);
    }
}
