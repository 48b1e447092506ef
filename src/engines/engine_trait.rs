//! Engine abstraction and option-string configuration.
//!
//! Every strategy implements [`Engine`] so the background search task can
//! drive any of them the same way. [`SearchConfig`] holds the tunable knobs
//! and accepts `setoption`-style name/value pairs.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_random::RandomEngine;
use crate::errors::ConfigError;
use crate::game_state::position::Position;
use crate::search::iterative_deepening::{SearchLimits, SearchUpdate, MAX_SEARCH_DEPTH};
use crate::search::transposition_table::{TranspositionTable, MAX_TT_SIZE_LOG2};

pub const DEFAULT_DEPTH: u8 = 4;
pub const DEFAULT_TT_SIZE_LOG2: u32 = 20;
pub const DEFAULT_SEED: u64 = 0x5eed_4c4e_55a1_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Paranoid,
    Hypermax,
    Random,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Paranoid => "paranoid",
            StrategyKind::Hypermax => "hypermax",
            StrategyKind::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "paranoid" => Ok(StrategyKind::Paranoid),
            "hypermax" => Ok(StrategyKind::Hypermax),
            "random" => Ok(StrategyKind::Random),
            _ => Err(ConfigError::InvalidValue {
                name: "Strategy".to_string(),
                value: text.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: StrategyKind,
    pub max_depth: u8,
    pub movetime: Option<Duration>,
    pub tt_size_log2: u32,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            max_depth: DEFAULT_DEPTH,
            movetime: None,
            tt_size_log2: DEFAULT_TT_SIZE_LOG2,
            seed: DEFAULT_SEED,
        }
    }
}

impl SearchConfig {
    /// Apply one named option. Names are case-insensitive. `MoveTime` is in
    /// milliseconds, and `0` removes the limit.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();

        match name.trim().to_ascii_lowercase().as_str() {
            "strategy" => self.strategy = value.parse().map_err(|_| invalid())?,
            "depth" => {
                let depth: u8 = value.parse().map_err(|_| invalid())?;
                if depth == 0 {
                    return Err(invalid());
                }
                self.max_depth = depth.min(MAX_SEARCH_DEPTH);
            }
            "movetime" => {
                let millis: u64 = value.parse().map_err(|_| invalid())?;
                self.movetime = (millis > 0).then(|| Duration::from_millis(millis));
            }
            "hash" => {
                let size_log2: u32 = value.parse().map_err(|_| invalid())?;
                if size_log2 > MAX_TT_SIZE_LOG2 {
                    return Err(invalid());
                }
                self.tt_size_log2 = size_log2;
            }
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
            movetime: self.movetime,
        }
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    /// Search `position`, calling `report` after each completed depth.
    /// Returns the last completed update, or `None` if cancelled before the
    /// first one or if there is nothing to search.
    fn search(
        &mut self,
        position: &Position,
        tt: &mut TranspositionTable,
        cancel: &AtomicBool,
        report: &mut dyn FnMut(&SearchUpdate),
    ) -> Option<SearchUpdate>;
}

pub fn build_engine(config: &SearchConfig) -> Box<dyn Engine> {
    match config.strategy {
        StrategyKind::Paranoid => Box::new(IterativeEngine::paranoid(config.limits())),
        StrategyKind::Hypermax => Box::new(IterativeEngine::hypermax(config.limits())),
        StrategyKind::Random => Box::new(RandomEngine::new(config.seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_update_the_config() {
        let mut config = SearchConfig::default();
        config.set_option("Strategy", "Hypermax").expect("valid strategy");
        config.set_option("depth", "99").expect("valid depth");
        config.set_option("MoveTime", "250").expect("valid movetime");
        config.set_option("Hash", "12").expect("valid hash");
        config.set_option("Seed", "7").expect("valid seed");

        assert_eq!(config.strategy, StrategyKind::Hypermax);
        assert_eq!(config.max_depth, MAX_SEARCH_DEPTH);
        assert_eq!(config.movetime, Some(Duration::from_millis(250)));
        assert_eq!(config.tt_size_log2, 12);
        assert_eq!(config.seed, 7);

        config.set_option("MoveTime", "0").expect("valid movetime");
        assert_eq!(config.movetime, None);
    }

    #[test]
    fn bad_options_are_rejected_without_changes() {
        let mut config = SearchConfig::default();
        assert_eq!(
            config.set_option("Threads", "4"),
            Err(ConfigError::UnknownOption("Threads".to_string()))
        );
        assert!(matches!(
            config.set_option("Depth", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set_option("Strategy", "maxn").is_err());
        assert!(config.set_option("Hash", "40").is_err());
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn engines_are_built_per_strategy() {
        let mut config = SearchConfig::default();
        assert_eq!(build_engine(&config).name(), "paranoid");
        config.strategy = StrategyKind::Hypermax;
        assert_eq!(build_engine(&config).name(), "hypermax");
        config.strategy = StrategyKind::Random;
        assert_eq!(build_engine(&config).name(), "random");
    }
}
