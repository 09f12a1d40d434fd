//! Runtime configuration shared by the game cores
//!
//! # Environment Variables
//!
//! - `BRICKGAME_SCORE_DIR`: directory for `<game>.score` files
//!   (default: `$HOME/.brickgame`)
//! - `BRICKGAME_NO_PERSIST`: set to "1" or "true" to keep high scores in memory only
//! - `BRICKGAME_SEED`: fixed RNG seed for reproducible sessions

use std::env;
use std::path::PathBuf;

use crate::rng::SimpleRng;
use crate::score::ScoreStore;

/// Name of the per-user score directory under `$HOME`
pub const SCORE_DIR_NAME: &str = ".brickgame";

/// Settings every game receives at creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Where score files live; `None` disables persistence
    pub score_dir: Option<PathBuf>,
    /// Fixed seed; `None` seeds from entropy
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            score_dir: dirs::home_dir().map(|home| home.join(SCORE_DIR_NAME)),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let disabled = var("BRICKGAME_NO_PERSIST")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let score_dir = if disabled {
            None
        } else {
            var("BRICKGAME_SCORE_DIR")
                .map(PathBuf::from)
                .or_else(|| Self::default().score_dir)
        };

        let seed = var("BRICKGAME_SEED").and_then(|s| s.parse().ok());

        Self { score_dir, seed }
    }

    /// Deterministic, persistence-free configuration
    pub fn ephemeral(seed: u32) -> Self {
        Self {
            score_dir: None,
            seed: Some(seed),
        }
    }

    /// Same seed handling, scores under `dir`
    pub fn with_score_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.score_dir = Some(dir.into());
        self
    }

    pub fn rng(&self) -> SimpleRng {
        match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        }
    }

    pub fn score_store(&self, game: &str) -> ScoreStore {
        match &self.score_dir {
            Some(dir) => ScoreStore::in_dir(dir, game),
            None => ScoreStore::memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_config_has_no_files() {
        let config = GameConfig::ephemeral(9);
        assert_eq!(config.score_dir, None);
        assert!(config.score_store("tetris").path().is_none());
    }

    #[test]
    fn fixed_seed_replays() {
        let config = GameConfig::ephemeral(42);
        assert_eq!(config.rng().next_u32(), config.rng().next_u32());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn lookup_defaults_to_home_dir() {
        let config = GameConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn lookup_trims_score_dir() {
        let config =
            GameConfig::from_lookup(lookup(&[("BRICKGAME_SCORE_DIR", "  /var/scores \n")]));
        assert_eq!(config.score_dir, Some(PathBuf::from("/var/scores")));
    }

    #[test]
    fn lookup_empty_score_dir_falls_back() {
        let config = GameConfig::from_lookup(lookup(&[("BRICKGAME_SCORE_DIR", "   ")]));
        assert_eq!(config.score_dir, GameConfig::default().score_dir);
    }

    #[test]
    fn lookup_no_persist_flags() {
        for flag in ["1", "true", "TRUE", " true "] {
            let config = GameConfig::from_lookup(lookup(&[
                ("BRICKGAME_NO_PERSIST", flag),
                ("BRICKGAME_SCORE_DIR", "/var/scores"),
            ]));
            assert_eq!(config.score_dir, None, "{flag:?}");
        }
        for flag in ["0", "no", ""] {
            let config = GameConfig::from_lookup(lookup(&[
                ("BRICKGAME_NO_PERSIST", flag),
                ("BRICKGAME_SCORE_DIR", "/var/scores"),
            ]));
            assert_eq!(config.score_dir, Some(PathBuf::from("/var/scores")), "{flag:?}");
        }
    }

    #[test]
    fn lookup_parses_seed() {
        let config = GameConfig::from_lookup(lookup(&[("BRICKGAME_SEED", " 77 ")]));
        assert_eq!(config.seed, Some(77));

        for bad in ["abc", "-1", "4294967296"] {
            let config = GameConfig::from_lookup(lookup(&[("BRICKGAME_SEED", bad)]));
            assert_eq!(config.seed, None, "{bad:?}");
        }
    }

    #[test]
    fn score_dir_builds_file_path() {
        let config = GameConfig::ephemeral(1).with_score_dir("/tmp/scores");
        let store = config.score_store("snake");
        assert_eq!(
            store.path(),
            Some(PathBuf::from("/tmp/scores/snake.score").as_path())
        );
    }
}
