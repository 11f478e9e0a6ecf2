use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use timer_core::{lap_rows, Lap};

use crate::stopwatch::StopwatchObserver;

pub const HELP_TEXT: &str = "\
Stopwatch
  p / ENTER  play / pause
  l          record lap
  r          reset
  h          this help
  q          quit";

/// Terminal front end. The elapsed time is rewritten in place on the current
/// line; lap lists and help are printed below it.
///
/// Clones share the same writer, so one can be registered as the observer
/// while the main loop keeps another for lap output.
pub struct TerminalDisplay<W: Write> {
    out: Rc<RefCell<W>>,
}

impl<W: Write> Clone for TerminalDisplay<W> {
    fn clone(&self) -> Self {
        Self {
            out: Rc::clone(&self.out),
        }
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
        }
    }

    pub fn draw_elapsed(&self, elapsed: &str) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        write!(out, "\r{}", elapsed)?;
        out.flush()
    }

    /// Prints the lap list newest first, then redraws the elapsed line.
    pub fn draw_laps(&self, laps: &[Lap], elapsed: &str) -> io::Result<()> {
        {
            let mut out = self.out.borrow_mut();
            writeln!(out)?;
            if laps.is_empty() {
                writeln!(out, "  (no laps)")?;
            }
            for row in lap_rows(laps) {
                writeln!(out, "  {}", row)?;
            }
        }
        self.draw_elapsed(elapsed)
    }

    pub fn draw_help(&self, elapsed: &str) -> io::Result<()> {
        {
            let mut out = self.out.borrow_mut();
            writeln!(out)?;
            writeln!(out, "{}", HELP_TEXT)?;
        }
        self.draw_elapsed(elapsed)
    }

    pub fn finish(&self) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out)?;
        out.flush()
    }
}

impl<W: Write> StopwatchObserver for TerminalDisplay<W> {
    fn timer_update(&self, elapsed: &str) {
        if let Err(e) = self.draw_elapsed(elapsed) {
            log::warn!("failed to draw elapsed time: {}", e);
        }
    }
}
