//! High-score persistence.
//!
//! The persisted layout is a single non-negative integer under
//! [`HIGH_SCORE_KEY`]. File storage keeps it in a flat JSON object so other
//! keys written by other tools survive a save.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::types::HIGH_SCORE_KEY;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("stored high score is malformed: {0}")]
    CorruptPersistedScore(String),
    #[error("high score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value style high-score storage.
pub trait HighScoreStore {
    fn get(&self) -> Result<u32, StoreError>;
    fn set(&mut self, value: u32) -> Result<(), StoreError>;
}

/// In-process store; also the fallback when nothing can be persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u32,
}

impl MemoryStore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryStore {
    fn get(&self) -> Result<u32, StoreError> {
        Ok(self.value)
    }

    fn set(&mut self, value: u32) -> Result<(), StoreError> {
        self.value = value;
        Ok(())
    }
}

/// JSON object file store, e.g. `{"blockfall.high_score": 4200}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Interpret a stored value as a high score.
///
/// Accepts JSON integers and integer strings; anything else is corrupt.
pub fn parse_score(value: &Value) -> Result<u32, StoreError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StoreError::CorruptPersistedScore(value.to_string()))
}

impl HighScoreStore for JsonFileStore {
    fn get(&self) -> Result<u32, StoreError> {
        let entries = self.read_entries()?;
        match entries.get(HIGH_SCORE_KEY) {
            Some(value) => parse_score(value),
            None => Ok(0),
        }
    }

    fn set(&mut self, value: u32) -> Result<(), StoreError> {
        // A file we cannot parse is replaced rather than blocking the save.
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(HIGH_SCORE_KEY.to_string(), Value::from(value));

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
