//! Logging setup.
//!
//! UCI communicates over stdout, so engine diagnostics must never land
//! there; `env_logger` is configured to write to stderr (its default) and
//! is initialized once, at startup, from the `CORVID_LOG` environment
//! variable (falling back to `RUST_LOG`, then to `default_filter`, which
//! the binary feeds from `EngineConfig::log_level`).
pub fn init(default_filter: &str) {
    let mut builder = env_logger::Builder::new();
    let filter = std::env::var("CORVID_LOG").or_else(|_| std::env::var("RUST_LOG"));
    match filter {
        Ok(spec) => {
            builder.parse_filters(&spec);
        }
        Err(_) => {
            builder.parse_filters(default_filter);
        }
    }
    builder.init();
}
