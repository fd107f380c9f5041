use core::fmt::{Debug, Display};
use core::num::NonZeroU32;
use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "wish2share.toml";
pub const ENV_PREFIX: &str = "WISH2SHARE_";

pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(5000) {
    Some(attempts) => attempts,
    None => unreachable!(),
};

/// Which algorithm produces the assignment.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Shuffle, assign greedily, retry on a dead end.
    #[default]
    RejectionSampling,
    /// Randomized bipartite matching. Always gives a definitive answer.
    Matching,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub strategy: StrategyKind,
    /// Upper bound on rejection sampling attempts before a draw is declared infeasible.
    pub max_attempts: NonZeroU32,
    /// How many eligible recipients every participant must keep when exclusions are configured.
    pub min_remaining_candidates: usize,
    /// Fixed seed for reproducible draws. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_remaining_candidates: 2,
            seed: None,
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Reads `wish2share.toml` from the working directory and `WISH2SHARE_*` variables.
pub fn get_config() -> Result<Config, ConfigError> {
    get_config_from(Path::new(CONFIG_FILE))
}

/// Like [`get_config`] but with an explicit file. A missing file is not an error.
pub fn get_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?)
}
