//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block game. It has **no**
//! dependencies on terminals, files, clocks or logging, which keeps it:
//!
//! - **Deterministic**: a seeded session replays identically
//! - **Testable**: every rule can be exercised without I/O
//! - **Portable**: runs headless, in a terminal, or behind any other front-end
//!
//! # Module Structure
//!
//! - [`pieces`]: the seven piece templates and shape-matrix rotation
//! - [`board`]: 10x20 grid with merge, full-row scan and row clearing
//! - [`collision`]: placement validity checks
//! - [`piece`]: pure spawn / move / rotate / hard-drop targeting
//! - [`controller`]: owner of the active and next piece
//! - [`rng`]: uniform random piece generation
//! - [`scoring`]: line clear points, level progression, gravity period
//! - [`clock`]: fixed-timestep gravity timer
//! - [`session`]: lifecycle state machine tying everything together
//! - [`snapshot`]: copyable read-only view for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every piece is an independent uniform draw
//! - **Naive rotation**: clockwise transpose-and-reverse, no wall kicks
//! - **Landing**: a blocked descent (gravity or soft drop) merges the piece
//! - **Scoring**: 100 / 300 / 500 / 800 for 1-4 lines
//! - **Levels**: one level per 10 lines, starting at level 1
//!
//! # Example
//!
//! ```
//! use blockfall_core::Session;
//! use blockfall_types::{Command, Event, Phase};
//!
//! let mut session = Session::with_seed(12345);
//! session.apply(Command::Start.into());
//! assert_eq!(session.phase(), Phase::Running);
//!
//! session.apply(Command::MoveRight.into());
//! session.apply(Command::RotateCw.into());
//! session.apply(Command::HardDrop.into());
//! let t = session.apply(Event::Gravity);
//! assert!(t.landing.is_some());
//! ```

pub mod board;
pub mod clock;
pub mod collision;
pub mod controller;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::{Board, FullRows};
pub use clock::GravityClock;
pub use collision::{check_placement, is_valid_placement, InvalidPlacement};
pub use controller::PieceController;
pub use piece::{hard_drop_target, spawn, try_move, try_rotate, ActivePiece};
pub use pieces::{template_for, Shape, Template};
pub use rng::PieceGenerator;
pub use scoring::{gravity_interval_ms, level_for_lines, line_clear_score};
pub use session::{Landing, Session, SessionStats, Transition};
pub use snapshot::GameSnapshot;
