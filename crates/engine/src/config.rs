//! Environment-driven configuration.
//!
//! - `BLOCKFALL_SEED`: u64 seed for the piece generator (default: OS entropy)
//! - `BLOCKFALL_HIGH_SCORE_PATH`: high score file (default: `blockfall-high-score.json`)
//! - `BLOCKFALL_NO_PERSIST`: `1` / `true` keeps the high score in memory only
//! - `BLOCKFALL_LOG`: log level (`error`..`trace`, default `info`)
//! - `BLOCKFALL_LOG_PATH`: log file (default `blockfall.log`)
//!
//! Malformed values fall back to the defaults.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_HIGH_SCORE_PATH: &str = "blockfall-high-score.json";
pub const DEFAULT_LOG_PATH: &str = "blockfall.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: Option<u64>,
    /// `None` disables persistence.
    pub high_score_path: Option<PathBuf>,
    pub log_level: String,
    pub log_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            high_score_path: Some(PathBuf::from(DEFAULT_HIGH_SCORE_PATH)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("BLOCKFALL_SEED").and_then(|s| s.parse().ok());

        let no_persist = non_empty("BLOCKFALL_NO_PERSIST")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);
        let high_score_path = if no_persist {
            None
        } else {
            Some(
                non_empty("BLOCKFALL_HIGH_SCORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_HIGH_SCORE_PATH)),
            )
        };

        let log_level = non_empty("BLOCKFALL_LOG")
            .map(|s| s.to_lowercase())
            .filter(|s| matches!(s.as_str(), "error" | "warn" | "info" | "debug" | "trace"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_path = non_empty("BLOCKFALL_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

        Self {
            seed,
            high_score_path,
            log_level,
            log_path,
        }
    }
}
