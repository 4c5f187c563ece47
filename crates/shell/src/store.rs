//! Leaderboard file on disk.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::core::{Leaderboard, LeaderboardError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LeaderboardError,
    },

    #[error("cannot save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: LeaderboardError,
    },
}

#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
    save_enabled: bool,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_enabled: true,
        }
    }

    /// Store that loads normally but never writes.
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            save_enabled: false,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_enabled(&self) -> bool {
        self.save_enabled
    }

    /// Load the file; a missing file is an empty leaderboard.
    pub fn load(&self) -> Result<Leaderboard, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no leaderboard file yet");
                return Ok(Leaderboard::new());
            }
            Err(source) => {
                return Err(StoreError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let board = Leaderboard::load(BufReader::new(file)).map_err(|source| StoreError::Load {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            records = board.len(),
            "leaderboard loaded"
        );
        Ok(board)
    }

    /// Rewrite the whole file.
    pub fn save(&self, board: &Leaderboard) -> Result<(), StoreError> {
        if !self.save_enabled {
            tracing::debug!("leaderboard saving disabled");
            return Ok(());
        }
        let file = File::create(&self.path).map_err(|source| StoreError::Save {
            path: self.path.clone(),
            source: LeaderboardError::Write(source),
        })?;
        board
            .save(BufWriter::new(file))
            .map_err(|source| StoreError::Save {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), records = board.len(), "leaderboard saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScoreRecord;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("leaderboard.txt"));
        let board = store.load().unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("leaderboard.txt"));

        let mut board = Leaderboard::new();
        board.submit(1, ScoreRecord::new(900, 20, 6, "Ann"));
        board.submit(2, ScoreRecord::new(700, 35, 9, "Bo"));
        store.save(&board).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "1,900,20,6,Ann\n2,700,35,9,Bo\n");
        assert_eq!(store.load().unwrap(), board);
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.txt");
        std::fs::write(&path, "2,850,45,10,Ann\nx,850,45,10,Ann\n\n").unwrap();
        let board = LeaderboardStore::new(&path).load().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.best_of(2).map(|r| r.score), Some(850));
    }

    #[test]
    fn test_read_only_store_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::read_only(dir.path().join("leaderboard.txt"));
        let mut board = Leaderboard::new();
        board.submit(1, ScoreRecord::new(1, 1, 1, "x"));
        store.save(&board).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("nope").join("leaderboard.txt"));
        let err = store.save(&Leaderboard::new()).unwrap_err();
        assert!(matches!(err, StoreError::Save { .. }));
        assert!(err.to_string().contains("cannot save"));
    }

    #[test]
    fn test_directory_path_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path());
        assert!(store.load().is_err());
    }
}
