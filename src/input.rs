use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::error::StopwatchError;
use crate::event::AppEvent;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    Toggle,
    Lap,
    Reset,
    Help,
    Quit,
}

/// Map one input line to a command. Only the first character counts.
pub fn parse_command(line: &str) -> Option<Command> {
    let key = match line.trim_end_matches(['\r', '\n']).chars().next() {
        Some(k) => k.to_ascii_lowercase(),
        None => return Some(Command::Toggle),
    };
    match key {
        'p' | ' ' => Some(Command::Toggle),
        'l' => Some(Command::Lap),
        'r' => Some(Command::Reset),
        'h' | '?' => Some(Command::Help),
        'q' => Some(Command::Quit),
        _ => None,
    }
}

/// Read commands from `reader` on a dedicated thread and forward them to the
/// main loop. Sends `InputClosed` at end of input.
pub fn spawn_reader<R>(
    reader: R,
    events: Sender<AppEvent>,
) -> Result<JoinHandle<()>, StopwatchError>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("failed to read input: {}", e);
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(cmd) => {
                        if events.send(AppEvent::Command(cmd)).is_err() {
                            return;
                        }
                    }
                    None => log::warn!("unknown command: {:?}", line.trim()),
                }
            }
            events.send(AppEvent::InputClosed).ok();
        })
        .map_err(StopwatchError::Spawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("p"), Some(Command::Toggle));
        assert_eq!(parse_command(""), Some(Command::Toggle));
        assert_eq!(parse_command(" "), Some(Command::Toggle));
        assert_eq!(parse_command("L"), Some(Command::Lap));
        assert_eq!(parse_command("reset"), Some(Command::Reset));
        assert_eq!(parse_command("?"), Some(Command::Help));
        assert_eq!(parse_command("h"), Some(Command::Help));
        assert_eq!(parse_command("q\r"), Some(Command::Quit));
        assert_eq!(parse_command("x"), None);
    }

    #[test]
    fn test_reader_forwards_commands_then_closes() {
        let (tx, rx) = mpsc::channel();
        let input = Cursor::new("p\nl\nnonsense\nr\n");
        spawn_reader(input, tx).unwrap().join().unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], AppEvent::Command(Command::Toggle)));
        assert!(matches!(events[1], AppEvent::Command(Command::Lap)));
        assert!(matches!(events[2], AppEvent::Command(Command::Reset)));
        assert!(matches!(events[3], AppEvent::InputClosed));
    }
}
