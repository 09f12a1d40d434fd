//! Tetris core
//!
//! - [`pieces`]: the seven kinds, rotations and the 4x4 shape table
//! - [`board`]: locked cells, collision and line clearing
//! - [`scoring`]: points per clear, level and speed
//! - [`game`]: the state machine and the [`Game`](crate::game::Game) implementation

pub mod board;
pub mod game;
pub mod pieces;
pub mod scoring;

pub use board::{Board, Cell, ClearedRows};
pub use game::{TetrisEvent, TetrisGame, TetrisModel, TetrisState, TETRIS_NAME};
pub use pieces::{bitmap, get_shape, PieceKind, Rotation, Tetromino, SPAWN_POSITION};
pub use scoring::{level_for_lines, line_clear_score, speed_for_level, LINE_SCORES};
