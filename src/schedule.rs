use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Deadline-based ticker; the first tick is due immediately.
pub struct FixedInterval {
    period: Duration,
    next: Instant,
}

impl FixedInterval {
    pub fn starting_now(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now(),
        }
    }

    /// Blocks until the next tick is due and returns its scheduled instant.
    ///
    /// Deadlines advance by exactly one period, so a late wake-up does not
    /// shift later ticks. Deadlines missed entirely (the process was stalled
    /// for more than a period) are skipped rather than replayed.
    pub fn tick(&mut self) -> Instant {
        let due = self.next;
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        self.next = due + self.period;
        if self.next < now {
            self.next = now + self.period;
        }
        due
    }
}

/// Runs `task` on a fresh thread at every tick, forever.
///
/// Runs are never awaited, so a slow one overlaps the next.
pub fn spawn_overlapping<F>(period: Duration, task: F) -> JoinHandle<()>
where
    F: Fn() + Send + Sync + 'static,
{
    let task = Arc::new(task);
    thread::spawn(move || {
        let mut interval = FixedInterval::starting_now(period);
        loop {
            interval.tick();
            let task = Arc::clone(&task);
            thread::spawn(move || task());
        }
    })
}
