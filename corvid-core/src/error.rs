//! Typed errors for the fallible boundaries of the engine core.

use thiserror::Error;

/// Errors produced while importing or exporting FEN text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is missing field: {0}")]
    MissingField(&'static str),
    #[error("piece placement field is malformed: {0}")]
    BadPlacement(String),
    #[error("active color field must be 'w' or 'b', got: {0}")]
    BadActiveColor(String),
    #[error("castling field is malformed: {0}")]
    BadCastling(String),
    #[error("en passant square is malformed: {0}")]
    BadEpSquare(String),
    #[error("half-move clock is not a valid number: {0}")]
    BadHalfMoveClock(String),
    #[error("full-move number is not a valid number: {0}")]
    BadFullMoveNumber(String),
    #[error("position is not legal: {0}")]
    Illegal(&'static str),
}

/// Errors produced while parsing or applying a move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("move text is malformed: {0}")]
    BadNotation(String),
    #[error("move is not pseudo-legal in the current position")]
    NotPseudoLegal,
    #[error("move leaves the mover's own king in check")]
    Illegal,
}

/// Errors raised by position-level validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveError),
}
