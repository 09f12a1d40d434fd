//! High score persistence
//!
//! One plain-text decimal integer per game, stored as `<dir>/<game>.score`.
//! Games use the forgiving [`ScoreStore::load`] / [`ScoreStore::save`] pair:
//! a missing or garbled file reads as 0, and a failed write is logged and
//! dropped. The `try_*` variants expose the underlying error for callers
//! that care.

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("score file does not hold a non-negative integer: {0}")]
    Parse(#[from] ParseIntError),
}

/// Location of one game's high score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreStore {
    path: Option<PathBuf>,
}

impl ScoreStore {
    /// Store backed by `<dir>/<game>.score`
    pub fn in_dir(dir: impl AsRef<Path>, game: &str) -> Self {
        Self::at(dir.as_ref().join(format!("{game}.score")))
    }

    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store that never touches the filesystem
    pub fn memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn try_load(&self) -> Result<u32, ScoreError> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let text = fs::read_to_string(path)?;
        Ok(text.trim().parse::<u32>()?)
    }

    pub fn try_save(&self, score: u32) -> Result<(), ScoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, format!("{score}\n"))?;
        Ok(())
    }

    /// Read the stored score, 0 when absent or unreadable
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(score) => score,
            Err(ScoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("ignoring high score at {:?}: {}", self.path, e);
                0
            }
        }
    }

    /// Overwrite the stored score, logging failures
    pub fn save(&self, score: u32) {
        if let Err(e) = self.try_save(score) {
            log::warn!("could not save high score to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir() -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "brickgame-score-test-{}-{}",
            std::process::id(),
            n
        ))
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let store = ScoreStore::in_dir(scratch_dir(), "tetris");
        assert_eq!(store.load(), 0);
        assert!(matches!(store.try_load(), Err(ScoreError::Io(_))));
    }

    #[test]
    fn test_garbage_reads_zero() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let store = ScoreStore::in_dir(&dir, "snake");

        fs::write(store.path().unwrap(), "not a number").unwrap();
        assert_eq!(store.load(), 0);
        assert!(matches!(store.try_load(), Err(ScoreError::Parse(_))));

        fs::write(store.path().unwrap(), "-5\n").unwrap();
        assert_eq!(store.load(), 0);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = scratch_dir().join("nested");
        let store = ScoreStore::in_dir(&dir, "tetris");

        store.save(1500);
        assert_eq!(fs::read_to_string(store.path().unwrap()).unwrap(), "1500\n");
        assert_eq!(store.load(), 1500);

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_memory_store_is_inert() {
        let store = ScoreStore::memory();
        store.save(77);
        assert_eq!(store.load(), 0);
        assert!(store.path().is_none());
    }

    proptest! {
        #[test]
        fn prop_save_then_load(score in prop_oneof![Just(0u32), Just(u32::MAX), any::<u32>()]) {
            let dir = scratch_dir();
            let store = ScoreStore::in_dir(&dir, "prop");
            store.try_save(score).unwrap();
            prop_assert_eq!(store.try_load().unwrap(), score);
            fs::remove_dir_all(dir).unwrap();
        }
    }
}
