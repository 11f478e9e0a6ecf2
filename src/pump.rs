use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::StopwatchError;
use crate::event::{AppEvent, Tick};
use crate::time::TimeSource;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PumpOp {
    Start { run: u64 },
    Stop,
    Quit,
}

/// Control side of the tick thread.
#[derive(Debug)]
pub struct Pump {
    ctl: Sender<PumpOp>,
}

impl Pump {
    pub fn spawn<T: TimeSource>(
        time: T,
        interval: Duration,
        events: Sender<AppEvent>,
    ) -> Result<(Self, JoinHandle<()>), StopwatchError> {
        let (ctl, ctl_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("pump".into())
            .spawn(move || pump_thread(ctl_rx, events, time, interval))
            .map_err(StopwatchError::Spawn)?;
        Ok((Self { ctl }, handle))
    }

    #[cfg(test)]
    pub fn from_sender(ctl: Sender<PumpOp>) -> Self {
        Self { ctl }
    }

    pub fn send(&self, op: PumpOp) {
        if self.ctl.send(op).is_err() {
            log::error!("pump is gone, dropped {:?}", op);
        }
    }
}

fn pump_thread<T: TimeSource>(
    ctl: Receiver<PumpOp>,
    events: Sender<AppEvent>,
    time: T,
    interval: Duration,
) {
    let mut run: Option<u64> = None;
    let mut deadline = time.now();

    loop {
        // Block when stopped, otherwise wait on control messages until the
        // next tick is due.
        let op = match run {
            None => match ctl.recv() {
                Ok(op) => Some(op),
                Err(_) => break,
            },
            Some(id) => {
                let wait = deadline.saturating_sub(time.now());
                match ctl.recv_timeout(wait) {
                    Ok(op) => Some(op),
                    Err(RecvTimeoutError::Timeout) => {
                        let at = time.now();
                        if events.send(AppEvent::Tick(Tick { run: id, at })).is_err() {
                            break;
                        }
                        deadline = next_deadline(deadline, interval, at);
                        None
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        };

        match op {
            Some(PumpOp::Start { run: id }) => {
                log::debug!("pump start, run {}", id);
                run = Some(id);
                deadline = time.now() + interval;
            }
            Some(PumpOp::Stop) => {
                log::debug!("pump stop");
                run = None;
            }
            Some(PumpOp::Quit) => break,
            None => {}
        }
    }
    log::debug!("pump exiting");
}

/// Fixed-rate schedule: the next deadline follows the previous one, unless
/// the tick at `at` is more than one interval late, in which case the
/// schedule restarts from `at` instead of bursting to catch up.
fn next_deadline(deadline: Duration, interval: Duration, at: Duration) -> Duration {
    let next = deadline + interval;
    if next + interval < at {
        log::trace!("pump fell behind, resyncing");
        at + interval
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{ManualTime, MonotonicTime};

    const INTERVAL: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(2);

    fn next_tick(rx: &Receiver<AppEvent>) -> Tick {
        match rx.recv_timeout(WAIT).expect("no tick") {
            AppEvent::Tick(tick) => tick,
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_pump_idle_until_started() {
        let (tx, rx) = mpsc::channel();
        let (pump, handle) = Pump::spawn(MonotonicTime::new(), INTERVAL, tx).unwrap();
        assert!(rx.recv_timeout(INTERVAL * 10).is_err());
        pump.send(PumpOp::Quit);
        handle.join().unwrap();
    }

    #[test]
    fn test_pump_ticks_tagged_with_run() {
        let (tx, rx) = mpsc::channel();
        let (pump, handle) = Pump::spawn(MonotonicTime::new(), INTERVAL, tx).unwrap();
        pump.send(PumpOp::Start { run: 7 });

        let first = next_tick(&rx);
        let second = next_tick(&rx);
        assert_eq!(first.run, 7);
        assert_eq!(second.run, 7);
        assert!(second.at >= first.at);

        pump.send(PumpOp::Quit);
        handle.join().unwrap();
    }

    #[test]
    fn test_pump_stops_ticking() {
        let (tx, rx) = mpsc::channel();
        let (pump, handle) = Pump::spawn(MonotonicTime::new(), INTERVAL, tx).unwrap();
        pump.send(PumpOp::Start { run: 1 });
        next_tick(&rx);

        pump.send(PumpOp::Stop);
        // Drain anything already in flight, then expect silence.
        thread::sleep(INTERVAL * 4);
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(INTERVAL * 10).is_err());

        pump.send(PumpOp::Start { run: 2 });
        assert_eq!(next_tick(&rx).run, 2);

        pump.send(PumpOp::Quit);
        handle.join().unwrap();
    }

    #[test]
    fn test_next_deadline_keeps_fixed_rate() {
        let interval = Duration::from_millis(10);
        // Slightly late ticks keep the original schedule.
        assert_eq!(
            next_deadline(Duration::from_millis(10), interval, Duration::from_millis(12)),
            Duration::from_millis(20)
        );
        assert_eq!(
            next_deadline(Duration::from_millis(10), interval, Duration::from_millis(30)),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn test_next_deadline_resyncs_when_far_behind() {
        let interval = Duration::from_millis(10);
        assert_eq!(
            next_deadline(Duration::from_millis(10), interval, Duration::from_millis(31)),
            Duration::from_millis(41)
        );
        assert_eq!(
            next_deadline(Duration::from_millis(10), interval, Duration::from_secs(5)),
            Duration::from_millis(5010)
        );
    }

    #[test]
    fn test_pump_does_not_burst_after_time_jump() {
        let time = ManualTime::default();
        let (tx, rx) = mpsc::channel();
        let (pump, handle) = Pump::spawn(time.clone(), INTERVAL, tx).unwrap();
        pump.send(PumpOp::Start { run: 3 });
        next_tick(&rx);

        // Jump hundreds of intervals ahead, then freeze.
        time.advance(Duration::from_secs(1));
        let tick = loop {
            let tick = next_tick(&rx);
            if tick.at >= Duration::from_secs(1) {
                break tick;
            }
        };
        assert_eq!(tick.run, 3);

        // Without a resync the pump would emit one tick per missed interval
        // back to back. With it, only the real-time cadence remains.
        thread::sleep(INTERVAL * 6);
        let burst = rx.try_iter().count();
        assert!(burst < 50, "pump burst {} ticks after a time jump", burst);

        pump.send(PumpOp::Quit);
        handle.join().unwrap();
    }

    #[test]
    fn test_pump_exits_when_control_dropped() {
        let (tx, _rx) = mpsc::channel();
        let (pump, handle) = Pump::spawn(MonotonicTime::new(), INTERVAL, tx).unwrap();
        drop(pump);
        handle.join().unwrap();
    }
}
