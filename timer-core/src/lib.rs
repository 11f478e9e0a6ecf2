//! Pure timing logic library with no platform dependencies.
//! Timestamps are passed in by the caller, so everything here is testable
//! on the host with simulated time.

use std::time::Duration;

/// Accumulates elapsed time across play/pause cycles.
///
/// Timestamps are offsets from an arbitrary monotonic origin chosen by the
/// caller. `now` only advances when the caller feeds it a tick, so a paused
/// clock simply stops receiving ticks and its elapsing value freezes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ElapsedClock {
    accumulated: Duration,
    segment_start: Duration,
    now: Duration,
}

impl ElapsedClock {
    pub fn new(now: Duration) -> Self {
        let mut clock = Self {
            accumulated: Duration::ZERO,
            segment_start: Duration::ZERO,
            now: Duration::ZERO,
        };
        clock.reset(now);
        clock
    }

    pub fn reset(&mut self, now: Duration) {
        self.accumulated = Duration::ZERO;
        self.segment_start = now;
        self.now = now;
    }

    /// Folds the running segment into the accumulator and starts a new
    /// segment at `now`.
    pub fn check(&mut self, now: Duration) {
        self.accumulated = self.elapsing();
        self.segment_start = now;
        self.now = now;
    }

    pub fn set_now(&mut self, at: Duration) {
        self.now = at;
    }

    pub fn elapsing(&self) -> Duration {
        self.accumulated + self.now.saturating_sub(self.segment_start)
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Lap {
    pub elapsed: Duration,
}

/// Format seconds as "HH:MM:SS.mmm". Milliseconds are the floor of the
/// fractional part, so 4.35 renders as "00:00:04.349".
pub fn format_hms_millis(secs: f64) -> String {
    let t = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let whole = t.floor() as u64;
    let millis = ((t % 1.0) * 1000.0).floor() as u64;
    let h = whole / 3600;
    let m = (whole / 60) % 60;
    let s = whole % 60;
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, millis)
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format_hms_millis(elapsed.as_secs_f64())
}

/// Lap rows for display, newest first. Labels keep the chronological lap
/// number, so the top row of three laps reads "Lap 3".
pub fn lap_rows(laps: &[Lap]) -> Vec<String> {
    let n = laps.len();
    (0..n)
        .map(|row| {
            let index = n - row - 1;
            format!("Lap {} {}", index + 1, format_elapsed(laps[index].elapsed))
        })
        .collect()
}
