//! Shared types - constants, actions and the snapshot every game exposes
//!
//! This crate defines the data that crosses the game contract boundary.
//! All types are plain data with no game logic, so the state machine, the
//! game cores and any host (terminal, GUI, test harness) can depend on it.
//!
//! # Field Dimensions
//!
//! Every game plays on the same fixed field:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Preview**: 4x4 matrix for the "next" piece
//!
//! # Cell Codes
//!
//! | Code | Tetris | Snake |
//! |------|--------|-------|
//! | 0 | empty | empty |
//! | 1..=7 | piece kind | 1 = body, 2 = head, 3 = apple |
//!
//! # Examples
//!
//! ```
//! use brickgame_types::{GameInfo, UserAction, FIELD_HEIGHT, FIELD_WIDTH};
//!
//! let action = UserAction::from_str("left").unwrap();
//! assert_eq!(action, UserAction::Left);
//!
//! let info = GameInfo::default();
//! assert_eq!(info.field.len(), FIELD_HEIGHT);
//! assert_eq!(info.field[0].len(), FIELD_WIDTH);
//! assert_eq!(info.level, 1);
//! ```

use std::fmt;

use serde::Serialize;

/// Field width in cells (10 columns)
pub const FIELD_WIDTH: usize = 10;

/// Field height in cells (20 rows)
pub const FIELD_HEIGHT: usize = 20;

/// Side of the square "next" preview matrix
pub const PREVIEW_SIZE: usize = 4;

/// Lowest level reported by any game
pub const MIN_LEVEL: u32 = 1;

/// Empty cell code shared by every game
pub const EMPTY_CELL: u8 = 0;

/// Snake body segment code
pub const SNAKE_BODY_CELL: u8 = 1;

/// Snake head code
pub const SNAKE_HEAD_CELL: u8 = 2;

/// Apple code
pub const SNAKE_APPLE_CELL: u8 = 3;

/// Row-major field matrix
pub type Field = [[u8; FIELD_WIDTH]; FIELD_HEIGHT];

/// Row-major preview matrix
pub type Preview = [[u8; PREVIEW_SIZE]; PREVIEW_SIZE];

/// Host-level actions shared by all games
///
/// Games translate these into their own events; an action a game has no use
/// for is ignored without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Begin (or restart) a round
    Start,
    /// Toggle pause
    Pause,
    /// End the current round
    Terminate,
    Left,
    Right,
    Up,
    Down,
    /// Game specific action button (rotate in Tetris)
    Action,
}

impl UserAction {
    /// All actions, in declaration order
    pub const ALL: [UserAction; 8] = [
        UserAction::Start,
        UserAction::Pause,
        UserAction::Terminate,
        UserAction::Left,
        UserAction::Right,
        UserAction::Up,
        UserAction::Down,
        UserAction::Action,
    ];

    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use brickgame_types::UserAction;
    ///
    /// assert_eq!(UserAction::from_str("Start"), Some(UserAction::Start));
    /// assert_eq!(UserAction::from_str("rotate"), Some(UserAction::Action));
    /// assert_eq!(UserAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(UserAction::Start),
            "pause" => Some(UserAction::Pause),
            "terminate" | "quit" => Some(UserAction::Terminate),
            "left" => Some(UserAction::Left),
            "right" => Some(UserAction::Right),
            "up" => Some(UserAction::Up),
            "down" => Some(UserAction::Down),
            "action" | "rotate" => Some(UserAction::Action),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Start => "start",
            UserAction::Pause => "pause",
            UserAction::Terminate => "terminate",
            UserAction::Left => "left",
            UserAction::Right => "right",
            UserAction::Up => "up",
            UserAction::Down => "down",
            UserAction::Action => "action",
        }
    }
}

/// Identifier a game contract is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub u16);

impl GameId {
    pub const TETRIS: GameId = GameId(1);
    pub const SNAKE: GameId = GameId(2);

    /// Parse a built-in game name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tetris" => Some(GameId::TETRIS),
            "snake" => Some(GameId::SNAKE),
            _ => None,
        }
    }

    /// Name of a built-in game, if this id is one
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            GameId::TETRIS => Some("tetris"),
            GameId::SNAKE => Some("snake"),
            _ => None,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "game#{}", self.0),
        }
    }
}

/// Read-only projection of a game's state
///
/// Each game owns exactly one of these, allocated at creation and refreshed
/// in place before it is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameInfo {
    pub field: Field,
    pub next: Preview,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub speed: u32,
    pub pause: bool,
}

impl GameInfo {
    /// Zero both matrices without touching the counters
    pub fn clear_matrices(&mut self) {
        self.field = [[EMPTY_CELL; FIELD_WIDTH]; FIELD_HEIGHT];
        self.next = [[EMPTY_CELL; PREVIEW_SIZE]; PREVIEW_SIZE];
    }

    /// Number of non-empty field cells
    pub fn filled_cells(&self) -> usize {
        self.field
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c != EMPTY_CELL)
            .count()
    }

    /// Find the first cell (row, col) holding `code`
    pub fn find(&self, code: u8) -> Option<(usize, usize)> {
        self.field.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|&c| c == code)
                .map(|col| (row, col))
        })
    }
}

impl Default for GameInfo {
    fn default() -> Self {
        Self {
            field: [[EMPTY_CELL; FIELD_WIDTH]; FIELD_HEIGHT],
            next: [[EMPTY_CELL; PREVIEW_SIZE]; PREVIEW_SIZE],
            score: 0,
            high_score: 0,
            level: MIN_LEVEL,
            speed: 0,
            pause: false,
        }
    }
}
