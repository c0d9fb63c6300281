//! High score persistence
//!
//! The engine only keeps the best score for the life of a `Session`. Hosts
//! that want it to survive restarts pick a `HighScoreStore`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Where the best score lives between runs
pub trait HighScoreStore {
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&self, score: u32) -> Result<(), StoreError>;

    /// Save only if `score` beats what is stored. Returns true if it did.
    fn record(&self, score: u32) -> Result<bool, StoreError> {
        if score > self.load()? {
            self.save(score)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// Store that forgets everything on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    score: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.score.load(Ordering::Relaxed))
    }

    fn save(&self, score: u32) -> Result<(), StoreError> {
        self.score.store(score, Ordering::Relaxed);
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// Store backed by a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load, treating a corrupt file as "no high score yet"
    pub fn load_or_zero(&self) -> u32 {
        match self.load() {
            Ok(score) => score,
            Err(e) => {
                log::info!("No high score loaded ({e}), starting fresh");
                0
            }
        }
    }
}

impl HighScoreStore for JsonFileStore {
    /// A missing file reads as 0
    fn load(&self) -> Result<u32, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let file: HighScoreFile = serde_json::from_str(&text)?;
        log::info!("Loaded high score {} from {}", file.high_score, self.path.display());
        Ok(file.high_score)
    }

    fn save(&self, score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string(&HighScoreFile { high_score: score })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_record() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), 0);
        assert!(store.record(4).unwrap());
        assert!(!store.record(3).unwrap());
        assert!(!store.record(4).unwrap());
        assert_eq!(store.load().unwrap(), 4);
    }

    #[test]
    fn test_json_file_store() {
        let path = std::env::temp_dir()
            .join(format!("quick-math-scores-{}", std::process::id()))
            .join("high_score.json");
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);

        assert!(store.record(7).unwrap());
        assert_eq!(store.load().unwrap(), 7);
        assert!(!store.record(5).unwrap());
        assert_eq!(JsonFileStore::new(&path).load_or_zero(), 7);

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let path = std::env::temp_dir().join(format!("quick-math-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        assert_eq!(store.load_or_zero(), 0);
        std::fs::remove_file(&path).unwrap();
    }
}
