//! Snake core
//!
//! - [`body`]: head-first segments with an O(1) occupancy index
//! - [`game`]: the state machine, movement step and the [`Game`](crate::game::Game) implementation

pub mod body;
pub mod game;

pub use body::{Body, Direction, Point};
pub use game::{
    SnakeEvent, SnakeGame, SnakeInput, SnakeModel, SnakeState, COOLDOWN_TICKS, INITIAL_LENGTH,
    MAX_LENGTH, SNAKE_NAME,
};
