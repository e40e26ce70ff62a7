//! Engine configuration: the handful of knobs exposed as UCI options, also
//! loadable from a `corvid.toml` file so the binary's defaults can be
//! overridden without retyping `setoption` on every launch.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default hash table size, in megabytes. Matches the teacher's own
/// `DEFAULT_TT_SIZE` default of 256MB.
pub const DEFAULT_HASH_MB: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Maximum search depth, as a safety backstop independent of the clock.
    pub max_depth: u8,
    /// `env_logger` filter spec applied when no `RUST_LOG`/`CORVID_LOG`
    /// environment variable is set. A file-supplied default, not a
    /// runtime-reconfigurable option -- logging is wired up once at
    /// start-up, before any `setoption` could reach it.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            hash_mb: DEFAULT_HASH_MB,
            max_depth: corvid_core::search::MAX_SEARCH_DEPTH,
            log_level: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn tt_size_bytes(&self) -> usize {
        self.hash_mb.max(1) * 1024 * 1024
    }

    pub fn from_toml_str(text: &str) -> Result<EngineConfig, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_hash_size() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.hash_mb, DEFAULT_HASH_MB);
        assert_eq!(cfg.tt_size_bytes(), DEFAULT_HASH_MB * 1024 * 1024);
    }

    #[test]
    fn parses_partial_overrides() {
        let cfg = EngineConfig::from_toml_str("hash_mb = 64\n").unwrap();
        assert_eq!(cfg.hash_mb, 64);
        assert_eq!(cfg.max_depth, corvid_core::search::MAX_SEARCH_DEPTH);
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(EngineConfig::from_toml_str("not valid toml =").is_err());
    }
}
