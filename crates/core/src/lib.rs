//! Game cores - pure, deterministic, and testable
//!
//! Both games are built the same way: a static transition table for
//! [`brickgame_fsm::Machine`], a model the table's callbacks mutate, and a
//! thin wrapper implementing the [`Game`] contract. Nothing here renders,
//! polls input, or keeps time; a host drives a game by calling
//! [`Game::input`] and [`Game::update`] and reads [`Game::info`].
//!
//! # Module Structure
//!
//! - [`game`]: the [`Game`] contract and [`GameFactory`]
//! - [`tetris`]: pieces, board, scoring and the Tetris machine
//! - [`snake`]: body with occupancy index and the Snake machine
//! - [`rng`]: seeded LCG so a fixed seed replays a session
//! - [`score`]: best-effort high score files
//! - [`config`]: environment-driven [`GameConfig`]
//!
//! # Example
//!
//! ```
//! use brickgame_core::{Game, GameConfig, TetrisGame};
//! use brickgame_core::types::UserAction;
//!
//! let mut game = TetrisGame::new(&GameConfig::ephemeral(12345)).unwrap();
//! game.input(UserAction::Start, false);
//! game.update();
//!
//! // The falling piece is part of the snapshot.
//! assert_eq!(game.info().filled_cells(), 4);
//! ```

pub mod config;
pub mod game;
pub mod rng;
pub mod score;
pub mod snake;
pub mod tetris;

pub use brickgame_types as types;

pub use config::GameConfig;
pub use game::{Game, GameFactory};
pub use rng::SimpleRng;
pub use score::{ScoreError, ScoreStore};
pub use snake::SnakeGame;
pub use tetris::TetrisGame;
