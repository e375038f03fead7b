//! Terminal input mapping.
//!
//! Translates `crossterm` key events into [`crate::types::Command`] values.
//! Holding a key relies on the terminal's own auto-repeat.

pub mod map;

pub use blockfall_types as types;

pub use map::{command_for_key, should_quit};
