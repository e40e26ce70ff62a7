//! Typed errors for the engine/UCI layer.

use corvid_core::error::{FenError, MoveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UciError {
    #[error("unrecognized command: {0}")]
    UnknownCommand(String),
    #[error("malformed 'position' command: {0}")]
    BadPosition(String),
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no position has been set; send a 'position' command first")]
    NoPosition,
    #[error(transparent)]
    Uci(#[from] UciError),
    #[error("configuration error: {0}")]
    Config(String),
}
