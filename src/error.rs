use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StopwatchError {
    #[error("failed to spawn thread")]
    Spawn(#[source] io::Error),
    #[error("tick rate must be between 1 and {max} Hz, got {rate}")]
    InvalidRate { rate: u32, max: u32 },
    #[error("terminal i/o failed")]
    Io(#[from] io::Error),
}
