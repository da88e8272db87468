//! Manually advanced scheduler for deterministic tests and simulations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use timed_door_domain::id::TimerId;

use super::fire;
use crate::ports::scheduler::TimerStatus;
use crate::ports::{FailureReporter, Registration, Scheduler, TimerTarget};

struct Entry {
    timer_id: TimerId,
    due: Duration,
    status: TimerStatus,
    target: Arc<dyn TimerTarget>,
}

#[derive(Default)]
struct Clock {
    elapsed: Duration,
    queue: Vec<Entry>,
}

/// A scheduler whose clock only moves when [`advance`](Self::advance) is
/// called. Targets fire on the caller's thread, in due order.
pub struct ManualScheduler<R> {
    clock: Mutex<Clock>,
    reporter: R,
}

impl<R: FailureReporter> ManualScheduler<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            clock: Mutex::new(Clock::default()),
            reporter,
        }
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock_clock().elapsed
    }

    /// Registrations that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.lock_clock()
            .queue
            .iter()
            .filter(|entry| entry.status.is_pending())
            .count()
    }

    /// Move the clock forward and fire everything that became due.
    ///
    /// Returns how many targets were fired. Timers scheduled by a firing
    /// target wait for the next call.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut clock = self.lock_clock();
            clock.elapsed = clock.elapsed.saturating_add(by);
            let now = clock.elapsed;
            let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut clock.queue)
                .into_iter()
                .filter(|entry| !entry.status.is_cancelled())
                .partition(|entry| entry.due <= now);
            clock.queue = waiting;
            due.sort_by_key(|entry| entry.due);
            due
        };

        let mut fired = 0;
        for entry in due {
            if !entry.status.begin_fire() {
                continue;
            }
            fire(entry.timer_id, entry.target.as_ref(), &self.reporter);
            fired += 1;
        }
        fired
    }

    fn lock_clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: FailureReporter> Scheduler for ManualScheduler<R> {
    fn schedule(&self, delay: Duration, target: Arc<dyn TimerTarget>) -> Registration {
        let timer_id = TimerId::new();
        let status = TimerStatus::new();
        let mut clock = self.lock_clock();
        clock.queue.retain(|entry| !entry.status.is_cancelled());
        let due = clock.elapsed.saturating_add(delay);
        clock.queue.push(Entry {
            timer_id,
            due,
            status: status.clone(),
            target,
        });
        tracing::debug!(%timer_id, due_ms = due.as_millis(), "manual timer scheduled");
        Registration::new(timer_id, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure_bus::InProcessFailureBus;
    use timed_door_domain::error::TimedDoorError;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl TimerTarget for Recorder {
        fn on_fired(&self) -> Result<(), TimedDoorError> {
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn should_not_fire_before_due() {
        let scheduler = ManualScheduler::new(InProcessFailureBus::new(4));
        let log = Arc::new(Mutex::new(Vec::new()));
        let _registration = scheduler.schedule(Duration::from_secs(5), recorder("a", &log));

        assert_eq!(scheduler.advance(Duration::from_secs(4)), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn should_fire_in_due_order() {
        let scheduler = ManualScheduler::new(InProcessFailureBus::new(4));
        let log = Arc::new(Mutex::new(Vec::new()));
        let _late = scheduler.schedule(Duration::from_secs(3), recorder("late", &log));
        let _early = scheduler.schedule(Duration::from_secs(1), recorder("early", &log));

        assert_eq!(scheduler.advance(Duration::from_secs(10)), 2);
        assert_eq!(*log.lock().unwrap(), vec!["early", "late"]);
    }

    #[test]
    fn should_skip_cancelled_registrations() {
        let scheduler = ManualScheduler::new(InProcessFailureBus::new(4));
        let log = Arc::new(Mutex::new(Vec::new()));
        let registration = scheduler.schedule(Duration::from_secs(1), recorder("a", &log));

        registration.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(2)), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn should_fire_each_registration_once() {
        let scheduler = ManualScheduler::new(InProcessFailureBus::new(4));
        let log = Arc::new(Mutex::new(Vec::new()));
        let registration = scheduler.schedule(Duration::from_secs(1), recorder("a", &log));

        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert!(registration.has_fired());
        assert_eq!(scheduler.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn should_drop_cancelled_entries_without_advancing() {
        let scheduler = ManualScheduler::new(InProcessFailureBus::new(4));
        let log = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..100 {
            let registration = scheduler.schedule(Duration::from_secs(5), recorder("a", &log));
            registration.cancel();
        }
        let _live = scheduler.schedule(Duration::from_secs(5), recorder("b", &log));

        assert_eq!(scheduler.lock_clock().queue.len(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(5)), 1);
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }
}
