//! Runtime configuration from environment variables.
//!
//! - `SKILLMESH_VOCAB_TTL_SECS`: autocomplete index cache TTL (default 600)
//! - `SKILLMESH_GRAPH_TTL_SECS`: co-occurrence graph and hash index cache TTL
//!   (default 1800)
//! - `SKILLMESH_SWEEP_SECS`: interval of the expired-entry sweep (default 60)

use std::time::Duration;

pub const VOCAB_TTL_VAR: &str = "SKILLMESH_VOCAB_TTL_SECS";
pub const GRAPH_TTL_VAR: &str = "SKILLMESH_GRAPH_TTL_SECS";
pub const SWEEP_VAR: &str = "SKILLMESH_SWEEP_SECS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub vocab_ttl: Duration,
    pub graph_ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            vocab_ttl: Duration::from_secs(600),
            graph_ttl: Duration::from_secs(1800),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads each setting through `lookup`. Missing, unparsable or zero
    /// values fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let seconds = |name: &str, fallback: Duration| match lookup(name) {
            None => fallback,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(variable = name, value = %raw, "ignoring invalid duration, using default");
                    fallback
                }
            },
        };

        Config {
            vocab_ttl: seconds(VOCAB_TTL_VAR, defaults.vocab_ttl),
            graph_ttl: seconds(GRAPH_TTL_VAR, defaults.graph_ttl),
            sweep_interval: seconds(SWEEP_VAR, defaults.sweep_interval),
        }
    }
}
