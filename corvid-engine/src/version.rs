//! Identification strings reported to the `uci` command.

pub static ID_NAME: &str = "Corvid";
pub static ID_AUTHORS: &str = "Corvid Engine Contributors";
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
