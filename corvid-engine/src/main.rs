//! `corvid`: a UCI chess engine binary.
//!
//! Reads UCI commands from stdin and writes responses to stdout until
//! `quit` or end-of-input. All diagnostics go to stderr via `log`/
//! `env_logger` so they never corrupt the UCI stream.

use corvid_engine::config::EngineConfig;
use corvid_engine::engine::Engine;
use corvid_engine::{logging, uci};

fn main() {
    let config = load_config();
    logging::init(&config.log_level);

    let mut engine = Engine::new(config);
    uci::run_stdio(&mut engine);
}

/// Looks for a config file at `$CORVID_CONFIG`, falling back to
/// `./corvid.toml`, and falls back further to defaults if neither is
/// present or the file is malformed (a missing config file is normal, not
/// an error worth refusing to start over).
fn load_config() -> EngineConfig {
    let path = std::env::var("CORVID_CONFIG").unwrap_or_else(|_| "corvid.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(text) => match EngineConfig::from_toml_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring {}: {}", path, e);
                EngineConfig::default()
            }
        },
        Err(_) => EngineConfig::default(),
    }
}
