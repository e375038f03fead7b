//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the rules engine, the dispatcher, and the terminal front-end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn anchor**: (`BOARD_WIDTH / 2 - 2`, 0) = (3, 0)
//!
//! # Gravity
//!
//! The gravity period shrinks by 80ms per level and bottoms out at 500ms:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1200ms |
//! | 2 | 1120ms |
//! | 5 | 880ms |
//! | 9 | 560ms |
//! | 10+ | 500ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, PieceKind, Phase, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(Phase::Idle.as_str(), "idle");
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Horizontal spawn anchor for every new piece.
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Vertical spawn anchor for every new piece.
pub const SPAWN_Y: i8 = 0;

/// Main loop poll interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity period at level 1.
pub const BASE_GRAVITY_MS: u32 = 1200;

/// Gravity speed-up per level.
pub const GRAVITY_STEP_MS: u32 = 80;

/// Shortest gravity period at any level.
pub const GRAVITY_FLOOR_MS: u32 = 500;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table, indexed by rows cleared in a single landing.
///
/// - 0 lines: 0
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Key under which the high score is persisted.
pub const HIGH_SCORE_KEY: &str = "blockfall.high_score";

/// The seven piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl PieceKind {
    /// Every kind, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::T => "t",
        }
    }
}

/// Color tag carried by pieces and by occupied board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Red,
    Purple,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Red => "red",
            Color::Purple => "purple",
        }
    }
}

/// A cell on the game board.
///
/// Occupancy and color are kept apart: an empty cell has no color at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(color) => Some(*color),
        }
    }
}

/// Abstract player commands.
///
/// Raw device events (keys, buttons) are mapped onto these by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Leave Idle (or resume from Paused)
    Start,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Drop piece one cell down, landing it if blocked
    SoftDrop,
    /// Move piece straight to its lowest valid row
    HardDrop,
    /// Pause or resume; also starts an idle session
    TogglePause,
    /// Back to Idle with a cleared board
    Reset,
}

impl Command {
    /// Parse command from camelCase string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("togglepause"), Some(Command::TogglePause));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotatecw" => Some(Command::RotateCw),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "togglepause" => Some(Command::TogglePause),
            "reset" => Some(Command::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::RotateCw => "rotateCw",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::TogglePause => "togglePause",
            Command::Reset => "reset",
        }
    }
}

/// Everything the session state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Command(Command),
    /// Synthetic one-row descent issued by the gravity clock
    Gravity,
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        Event::Command(command)
    }
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(Phase::Idle),
            "running" => Some(Phase::Running),
            "paused" => Some(Phase::Paused),
            "game_over" | "gameover" => Some(Phase::GameOver),
            _ => None,
        }
    }
}
