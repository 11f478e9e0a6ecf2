use std::time::Duration;

use clap::Parser;

use crate::error::StopwatchError;

pub const DEFAULT_RATE_HZ: u32 = 60;
pub const MAX_RATE_HZ: u32 = 1000;

/// Terminal stopwatch with laps.
///
/// Commands are read one per line: p (or empty line) = play/pause, l = lap,
/// r = reset, h = help, q = quit.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Display refresh rate while running, in ticks per second.
    #[arg(long = "rate", default_value_t = DEFAULT_RATE_HZ)]
    pub rate_hz: u32,

    /// Enable debug logging on stderr.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Only print the lap list when a lap is recorded or the watch is reset.
    #[arg(long = "no-laps-on-update", default_value_t = false)]
    pub no_laps_on_update: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), StopwatchError> {
        if self.rate_hz == 0 || self.rate_hz > MAX_RATE_HZ {
            return Err(StopwatchError::InvalidRate {
                rate: self.rate_hz,
                max: MAX_RATE_HZ,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.rate_hz.max(1)
    }
}
