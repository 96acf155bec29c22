//! Logging initialization for the calops binary.
//!
//! Diagnostics go through `tracing`; the maintenance commands keep their
//! human-readable status output on plain stdout.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. Call once at startup.
///
/// `RUST_LOG` overrides `default_level` when set.
pub fn init_logging(default_level: Level) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_level.to_string().to_lowercase())
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_safe_to_call_once() {
        // A second init would panic (global subscriber already set), so the
        // suite exercises it exactly once.
        init_logging(Level::WARN);
        tracing::warn!("logging initialized");
    }
}
