use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time for the runtime and payload builders.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Blocking pause used by the simulated exchanges.
pub trait Delay {
    fn sleep_ms(&self, millis: u64);
}

/// Clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Delay that actually sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl Delay for SystemDelay {
    fn sleep_ms(&self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}

/// Zero-cost delay for tests and headless drives.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl Delay for NoopDelay {
    fn sleep_ms(&self, _millis: u64) {}
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}
