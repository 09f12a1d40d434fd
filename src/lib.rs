//! Brick game (workspace facade crate).
//!
//! Re-exports the workspace crates as `brickgame::{types,fsm,core,engine}` so
//! hosts and integration tests depend on a single package.

pub use brickgame_core as core;
pub use brickgame_engine as engine;
pub use brickgame_fsm as fsm;
pub use brickgame_types as types;
