/// Time source and sleep for the countdown loop
use std::thread;
use std::time::{Duration, Instant};

/// Supplies the current time and blocks between ticks.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
