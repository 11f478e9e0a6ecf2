use std::time::{Duration, Instant};

/// Monotonic timestamps, expressed as offsets from a fixed origin.
///
/// Cloned into the pump thread so ticks and controller rebases are measured
/// against the same origin.
pub trait TimeSource: Clone + Send + 'static {
    fn now(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
pub use manual::ManualTime;
