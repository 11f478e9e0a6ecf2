use std::time::Duration;

use crate::input::Command;

/// A tick from the pump, tagged with the run it was started for.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tick {
    pub run: u64,
    pub at: Duration,
}

/// Everything the main loop receives, in delivery order.
#[derive(Debug)]
pub enum AppEvent {
    Tick(Tick),
    Command(Command),
    InputClosed,
}
