//! Engine - game registry and the single active session
//!
//! An [`Engine`] holds up to [`MAX_GAMES`] registered [`GameContract`]s and
//! at most one running game. Hosts talk to the engine only; it forwards
//! input, ticks and snapshot queries to whichever game is active and turns
//! them into no-ops when none is.
//!
//! Engines are plain values, so several can coexist (one per test, say).
//!
//! # Example
//!
//! ```
//! use brickgame_core::GameConfig;
//! use brickgame_engine::Engine;
//! use brickgame_types::{GameId, UserAction};
//!
//! let mut engine = Engine::with_builtin_games(&GameConfig::ephemeral(7));
//! engine.switch_to(GameId::SNAKE).unwrap();
//! engine.input(UserAction::Start, false);
//!
//! let info = engine.tick().unwrap();
//! assert_eq!(info.level, 1);
//! assert_eq!(engine.active_id(), Some(GameId::SNAKE));
//! ```

use arrayvec::ArrayVec;
use thiserror::Error;

use brickgame_core::{Game, GameConfig, GameFactory, SnakeGame, TetrisGame};
use brickgame_types::{GameId, GameInfo, UserAction};

/// Registry capacity
pub const MAX_GAMES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no game registered under {0}")]
    UnknownGame(GameId),

    #[error("could not create {0}")]
    CreateFailed(GameId),
}

/// A registered game: its id and how to build an instance
pub struct GameContract {
    pub id: GameId,
    pub create: GameFactory,
}

impl GameContract {
    pub fn new<F>(id: GameId, create: F) -> Self
    where
        F: Fn() -> Option<Box<dyn Game>> + 'static,
    {
        Self {
            id,
            create: Box::new(create),
        }
    }

    /// Tetris built from `config` on every switch
    pub fn tetris(config: GameConfig) -> Self {
        Self::new(GameId::TETRIS, move || match TetrisGame::new(&config) {
            Ok(game) => Some(Box::new(game) as Box<dyn Game>),
            Err(e) => {
                log::warn!("tetris: create failed: {}", e);
                None
            }
        })
    }

    /// Snake built from `config` on every switch
    pub fn snake(config: GameConfig) -> Self {
        Self::new(GameId::SNAKE, move || match SnakeGame::new(&config) {
            Ok(game) => Some(Box::new(game) as Box<dyn Game>),
            Err(e) => {
                log::warn!("snake: create failed: {}", e);
                None
            }
        })
    }
}

impl std::fmt::Debug for GameContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContract").field("id", &self.id).finish()
    }
}

struct Session {
    id: GameId,
    game: Box<dyn Game>,
}

/// Registry plus at most one live game
#[derive(Default)]
pub struct Engine {
    contracts: ArrayVec<GameContract, MAX_GAMES>,
    active: Option<Session>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with Tetris and Snake registered
    pub fn with_builtin_games(config: &GameConfig) -> Self {
        let mut engine = Self::new();
        engine.register(GameContract::tetris(config.clone()));
        engine.register(GameContract::snake(config.clone()));
        engine
    }

    /// Add a contract
    ///
    /// Returns `false` without touching the registry when the id is already
    /// registered or the registry is full. Neither case is an error.
    pub fn register(&mut self, contract: GameContract) -> bool {
        if self.is_registered(contract.id) {
            log::debug!("engine: {} already registered", contract.id);
            return false;
        }
        let id = contract.id;
        match self.contracts.try_push(contract) {
            Ok(()) => {
                log::debug!("engine: registered {}", id);
                true
            }
            Err(_) => {
                log::warn!("engine: registry full, ignoring {}", id);
                false
            }
        }
    }

    pub fn is_registered(&self, id: GameId) -> bool {
        self.contracts.iter().any(|c| c.id == id)
    }

    /// Registered ids in registration order
    pub fn registered(&self) -> impl Iterator<Item = GameId> + '_ {
        self.contracts.iter().map(|c| c.id)
    }

    pub fn active_id(&self) -> Option<GameId> {
        self.active.as_ref().map(|s| s.id)
    }

    /// Make `id` the active game
    ///
    /// Switching to the game already running keeps the instance. Otherwise
    /// the old game is dropped before the new one is built; if building
    /// fails no game is left active.
    pub fn switch_to(&mut self, id: GameId) -> Result<(), EngineError> {
        let Some(contract) = self.contracts.iter().find(|c| c.id == id) else {
            return Err(EngineError::UnknownGame(id));
        };
        if self.active_id() == Some(id) {
            return Ok(());
        }

        if let Some(old) = self.active.take() {
            log::info!("engine: closing {}", old.id);
            drop(old);
        }

        let game = (contract.create)().ok_or(EngineError::CreateFailed(id))?;
        log::info!("engine: switched to {}", id);
        self.active = Some(Session { id, game });
        Ok(())
    }

    /// Drop the active game, if any
    pub fn close(&mut self) {
        if let Some(old) = self.active.take() {
            log::info!("engine: closing {}", old.id);
        }
    }

    pub fn input(&mut self, action: UserAction, hold: bool) {
        if let Some(session) = &mut self.active {
            session.game.input(action, hold);
        }
    }

    pub fn update(&mut self) {
        if let Some(session) = &mut self.active {
            session.game.update();
        }
    }

    /// Snapshot of the active game
    pub fn info(&mut self) -> Option<&GameInfo> {
        self.active.as_mut().map(|s| s.game.info())
    }

    /// One host frame: update, then snapshot
    pub fn tick(&mut self) -> Option<&GameInfo> {
        self.update();
        self.info()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registered", &self.registered().collect::<Vec<_>>())
            .field("active", &self.active_id())
            .finish()
    }
}
