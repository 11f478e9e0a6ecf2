use std::time::Duration;

use timer_core::{format_elapsed, ElapsedClock, Lap};

use crate::event::Tick;
use crate::pump::{Pump, PumpOp};
use crate::time::TimeSource;

/// Receives the formatted elapsed time whenever it changes or is reset.
pub trait StopwatchObserver {
    fn timer_update(&self, elapsed: &str);
}

/// Stopwatch state machine: Paused (no run) or Running (pump ticking for
/// the current run id).
///
/// All methods are called from the main loop, which is also the only place
/// ticks are applied, so the clock has a single writer.
pub struct StopwatchController<T: TimeSource> {
    time: T,
    clock: ElapsedClock,
    laps: Vec<Lap>,
    pump: Pump,
    run: Option<u64>,
    next_run: u64,
    observer: Option<Box<dyn StopwatchObserver>>,
}

impl<T: TimeSource> StopwatchController<T> {
    pub fn new(time: T, pump: Pump) -> Self {
        let clock = ElapsedClock::new(time.now());
        Self {
            time,
            clock,
            laps: Vec::new(),
            pump,
            run: None,
            next_run: 0,
            observer: None,
        }
    }

    /// Registers the observer and brings it up to date.
    pub fn set_observer(&mut self, observer: Box<dyn StopwatchObserver>) {
        observer.timer_update(&self.elapsed());
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn play(&mut self) {
        if self.is_running() {
            log::debug!("play ignored, already running");
            return;
        }
        self.clock.check(self.time.now());
        let run = self.next_run;
        self.next_run += 1;
        self.run = Some(run);
        self.pump.send(PumpOp::Start { run });
        log::info!("play, {} accumulated", format_elapsed(self.clock.accumulated()));
    }

    pub fn pause(&mut self) {
        if self.run.take().is_none() {
            return;
        }
        self.pump.send(PumpOp::Stop);
        log::info!("pause at {}", self.elapsed());
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn reset(&mut self) {
        self.pause();
        self.clock.reset(self.time.now());
        self.laps.clear();
        log::info!("reset");
        self.notify(&format_elapsed(Duration::ZERO));
    }

    pub fn record(&mut self) {
        let lap = Lap {
            elapsed: self.clock.elapsing(),
        };
        self.laps.push(lap);
        log::info!("lap {} at {}", self.laps.len(), format_elapsed(lap.elapsed));
    }

    pub fn handle_tick(&mut self, tick: Tick) {
        if self.run != Some(tick.run) {
            log::trace!("dropping stale tick from run {}", tick.run);
            return;
        }
        self.clock.set_now(tick.at);
        self.notify(&self.elapsed());
    }

    pub fn elapsing(&self) -> Duration {
        self.clock.elapsing()
    }

    pub fn elapsed(&self) -> String {
        format_elapsed(self.clock.elapsing())
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Stops ticking and tells the pump thread to exit.
    pub fn shutdown(&mut self) {
        self.pause();
        self.pump.send(PumpOp::Quit);
    }

    fn notify(&self, elapsed: &str) {
        if let Some(observer) = &self.observer {
            observer.timer_update(elapsed);
        }
    }
}
