mod config;
mod error;
mod event;
mod input;
mod pump;
mod stopwatch;
mod time;
mod ui;

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use crate::config::Config;
use crate::error::StopwatchError;
use crate::event::AppEvent;
use crate::input::Command;
use crate::pump::Pump;
use crate::stopwatch::StopwatchController;
use crate::time::{MonotonicTime, TimeSource};
use crate::ui::TerminalDisplay;

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // stderr keeps log lines out of the in-place elapsed display on stdout.
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter_level(level_filter)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

struct StopwatchApp<T: TimeSource, W: Write> {
    stopwatch: StopwatchController<T>,
    display: TerminalDisplay<W>,
    laps_on_update: bool,
}

impl<T: TimeSource, W: Write + 'static> StopwatchApp<T, W> {
    fn new(
        mut stopwatch: StopwatchController<T>,
        display: TerminalDisplay<W>,
        laps_on_update: bool,
    ) -> Self {
        stopwatch.set_observer(Box::new(display.clone()));
        Self {
            stopwatch,
            display,
            laps_on_update,
        }
    }

    /// Returns false once the app should exit.
    fn handle_command(&mut self, cmd: Command) -> Result<bool, StopwatchError> {
        log::debug!("command {:?}", cmd);
        match cmd {
            Command::Toggle => self.stopwatch.toggle(),
            Command::Lap => self.stopwatch.record(),
            Command::Reset => self.stopwatch.reset(),
            Command::Help => {
                self.display.draw_help(&self.stopwatch.elapsed())?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }
        if self.laps_on_update || matches!(cmd, Command::Lap | Command::Reset) {
            self.display.draw_laps(self.stopwatch.laps(), &self.stopwatch.elapsed())?;
        }
        Ok(true)
    }

    fn run(&mut self, events: &Receiver<AppEvent>) -> Result<(), StopwatchError> {
        while let Ok(event) = events.recv() {
            match event {
                AppEvent::Tick(tick) => self.stopwatch.handle_tick(tick),
                AppEvent::Command(cmd) => {
                    if !self.handle_command(cmd)? {
                        break;
                    }
                }
                AppEvent::InputClosed => break,
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.stopwatch.shutdown();
        log::info!("stopped at {:?}", self.stopwatch.elapsing());
        self.stopwatch.clear_observer();
        self.display.finish()
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    configure_logging(config.verbose);
    config.validate().context("invalid configuration")?;
    log::info!("tick interval {:?}", config.tick_interval());

    let (tx, rx) = mpsc::channel();
    let time = MonotonicTime::new();
    let (pump, pump_handle) =
        Pump::spawn(time, config.tick_interval(), tx.clone()).context("can't start pump")?;
    input::spawn_reader(io::BufReader::new(io::stdin()), tx)
        .context("can't start input reader")?;

    let display = TerminalDisplay::new(io::stdout());
    display.draw_help("").context("can't draw help")?;
    let stopwatch = StopwatchController::new(time, pump);
    let mut app = StopwatchApp::new(stopwatch, display, !config.no_laps_on_update);

    let result = app.run(&rx);
    app.shutdown().context("can't restore terminal")?;
    if pump_handle.join().is_err() {
        log::error!("pump thread panicked");
    }
    result?;
    Ok(())
}
