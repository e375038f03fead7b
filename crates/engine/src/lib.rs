//! Engine layer: the serialized event dispatcher plus the I/O collaborators
//! (high score storage, configuration) the pure core stays free of.

pub mod config;
pub mod engine;
pub mod store;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::EngineConfig;
pub use engine::{Engine, NullRenderer, Renderer};
pub use store::{parse_score, HighScoreStore, JsonFileStore, MemoryStore, StoreError};
