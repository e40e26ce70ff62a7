//! The UCI driver built on top of `corvid-core`: command parsing,
//! session/game state, timing, configuration, and logging.
//!
//! `corvid-core` knows nothing about process I/O or UCI text; this crate
//! owns that boundary and drives the core's search from it.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logging;
pub mod uci;
pub mod version;

pub use engine::Engine;
pub use error::{EngineError, UciError};
