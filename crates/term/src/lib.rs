//! Terminal front-end.
//!
//! Renders into a plain framebuffer rather than a widget toolkit, then flushes
//! the difference to the terminal. Board cells are two columns wide to offset
//! the usual glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{block_rgb, GameView, Viewport, MAX_CELL_SIZE};
pub use renderer::{
    encode_diff_into, encode_full_into, enter_terminal, leave_terminal, TerminalRenderer,
};
