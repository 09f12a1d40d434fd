//! Tetris game - the state machine table and the model its callbacks drive
//!
//! Falling-piece movement stays inside `Fall` as self-loops. A movement
//! callback that finds the piece resting on something only raises the
//! `landed` flag; [`TetrisGame`] then fires the internal `Lock` event, so the
//! table alone decides what is legal in each state. A spawn that collides
//! sets `game_over` and the automatic `SpawnBlocked` transition takes the
//! machine to `GameOver` before the call returns.

use brickgame_fsm::{Event, FsmError, Machine, Transition};

use crate::config::GameConfig;
use crate::game::Game;
use crate::rng::SimpleRng;
use crate::score::ScoreStore;
use crate::types::{GameInfo, UserAction, EMPTY_CELL, FIELD_HEIGHT, FIELD_WIDTH, PREVIEW_SIZE};

use super::board::Board;
use super::pieces::{bitmap, PieceKind, Rotation, Tetromino};
use super::scoring::{level_for_lines, line_clear_score, speed_for_level};

/// Name used for the score file
pub const TETRIS_NAME: &str = "tetris";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrisState {
    Init,
    Spawn,
    Fall,
    Lock,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrisEvent {
    Start,
    Tick,
    MoveLeft,
    MoveRight,
    Rotate,
    /// Soft drop: one row
    MoveDown,
    /// Hard drop: straight to the floor
    Drop,
    PauseToggle,
    Terminate,
    /// Raised internally once the falling piece has landed
    Lock,
    /// Taken automatically when a fresh piece cannot be placed
    SpawnBlocked,
}

impl Event for TetrisEvent {
    fn is_automatic(&self) -> bool {
        matches!(self, TetrisEvent::SpawnBlocked)
    }
}

impl TetrisEvent {
    /// Translate a host action
    ///
    /// `Down` is a soft drop, or a hard drop while the key is held.
    pub fn from_action(action: UserAction, hold: bool) -> Option<Self> {
        match action {
            UserAction::Start => Some(TetrisEvent::Start),
            UserAction::Pause => Some(TetrisEvent::PauseToggle),
            UserAction::Terminate => Some(TetrisEvent::Terminate),
            UserAction::Left => Some(TetrisEvent::MoveLeft),
            UserAction::Right => Some(TetrisEvent::MoveRight),
            UserAction::Down if hold => Some(TetrisEvent::Drop),
            UserAction::Down => Some(TetrisEvent::MoveDown),
            UserAction::Action => Some(TetrisEvent::Rotate),
            UserAction::Up => None,
        }
    }
}

type Row = Transition<TetrisState, TetrisEvent, TetrisModel>;

static TRANSITIONS: [Row; 16] = {
    use TetrisEvent as E;
    use TetrisState as S;
    [
        Row::new(S::Init, E::Start, S::Spawn, Some(reset_round), Some(spawn_piece)),
        Row::new(S::Spawn, E::Tick, S::Fall, None, None),
        Row::new(S::Spawn, E::SpawnBlocked, S::GameOver, None, Some(finish_round)),
        Row::new(S::Fall, E::Tick, S::Fall, None, Some(step_down)),
        Row::new(S::Fall, E::MoveDown, S::Fall, None, Some(step_down)),
        Row::new(S::Fall, E::Drop, S::Fall, None, Some(hard_drop)),
        Row::new(S::Fall, E::MoveLeft, S::Fall, None, Some(move_left)),
        Row::new(S::Fall, E::MoveRight, S::Fall, None, Some(move_right)),
        Row::new(S::Fall, E::Rotate, S::Fall, None, Some(rotate)),
        Row::new(S::Fall, E::Lock, S::Lock, None, Some(lock_piece)),
        Row::new(S::Fall, E::PauseToggle, S::Paused, None, None),
        Row::new(S::Paused, E::PauseToggle, S::Fall, None, None),
        Row::new(S::Fall, E::Terminate, S::GameOver, None, Some(finish_round)),
        Row::new(S::Paused, E::Terminate, S::GameOver, None, Some(finish_round)),
        Row::new(S::Lock, E::Tick, S::Spawn, None, Some(spawn_piece)),
        Row::new(S::GameOver, E::Start, S::Spawn, Some(reset_round), Some(spawn_piece)),
    ]
};

/// Everything the transition callbacks read and write
#[derive(Debug)]
pub struct TetrisModel {
    board: Board,
    current: Option<Tetromino>,
    next: (PieceKind, Rotation),
    rng: SimpleRng,
    score: u32,
    high_score: u32,
    lines: u32,
    level: u32,
    speed: u32,
    landed: bool,
    game_over: bool,
    store: ScoreStore,
}

impl TetrisModel {
    fn new(rng: SimpleRng, store: ScoreStore) -> Self {
        let high_score = store.load();
        let mut model = Self {
            board: Board::new(),
            current: None,
            next: (PieceKind::I, Rotation::North),
            rng,
            score: 0,
            high_score,
            lines: 0,
            level: level_for_lines(0),
            speed: speed_for_level(level_for_lines(0)),
            landed: false,
            game_over: false,
            store,
        };
        model.next = model.roll();
        model
    }

    fn roll(&mut self) -> (PieceKind, Rotation) {
        let kind = PieceKind::from_index(self.rng.next_range(7) as usize);
        let rotation = Rotation::from_index(self.rng.next_range(4) as usize);
        (kind, rotation)
    }

    /// Move the current piece to `candidate` unless it collides
    fn try_place(&mut self, candidate: Tetromino) -> bool {
        if self.board.collides(&candidate) {
            return false;
        }
        self.current = Some(candidate);
        true
    }

    fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        match self.current {
            Some(piece) => self.try_place(piece.shifted(dx, dy)),
            None => false,
        }
    }

    fn record_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("tetris: new high score {}", self.high_score);
            self.store.save(self.high_score);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Tetromino> {
        self.current
    }

    pub fn next(&self) -> (PieceKind, Rotation) {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

fn reset_round(m: &mut TetrisModel) {
    m.board.clear();
    m.current = None;
    m.score = 0;
    m.lines = 0;
    m.level = level_for_lines(0);
    m.speed = speed_for_level(m.level);
    m.landed = false;
    m.game_over = false;
    log::info!("tetris: round started");
}

fn spawn_piece(m: &mut TetrisModel) {
    let (kind, rotation) = m.next;
    m.next = m.roll();

    let piece = Tetromino::new(kind, rotation);
    m.current = Some(piece);
    if m.board.collides(&piece) {
        m.game_over = true;
    }
}

fn step_down(m: &mut TetrisModel) {
    if !m.try_shift(0, 1) {
        m.landed = true;
    }
}

fn hard_drop(m: &mut TetrisModel) {
    while m.try_shift(0, 1) {}
    m.landed = true;
}

fn move_left(m: &mut TetrisModel) {
    m.try_shift(-1, 0);
}

fn move_right(m: &mut TetrisModel) {
    m.try_shift(1, 0);
}

fn rotate(m: &mut TetrisModel) {
    if let Some(piece) = m.current {
        m.try_place(piece.rotated(true));
    }
}

fn lock_piece(m: &mut TetrisModel) {
    let Some(piece) = m.current.take() else {
        return;
    };
    m.board.lock_piece(&piece);

    let cleared = m.board.clear_full_rows();
    if cleared.is_empty() {
        return;
    }
    m.score = m.score.saturating_add(line_clear_score(cleared.len()));
    m.lines += cleared.len() as u32;
    m.level = level_for_lines(m.lines);
    m.speed = speed_for_level(m.level);
    log::debug!(
        "tetris: cleared {} rows, score {} level {}",
        cleared.len(),
        m.score,
        m.level
    );
    m.record_high_score();
}

fn finish_round(m: &mut TetrisModel) {
    m.game_over = true;
    m.record_high_score();
    log::info!("tetris: game over with score {}", m.score);
}

/// A Tetris instance behind the [`Game`] contract
#[derive(Debug)]
pub struct TetrisGame {
    machine: Machine<TetrisState, TetrisEvent, TetrisModel>,
    model: TetrisModel,
    info: GameInfo,
}

impl TetrisGame {
    pub fn new(config: &GameConfig) -> Result<Self, FsmError> {
        Self::with_parts(config.rng(), config.score_store(TETRIS_NAME))
    }

    pub fn with_parts(rng: SimpleRng, store: ScoreStore) -> Result<Self, FsmError> {
        let machine = Machine::new(&TRANSITIONS, TetrisState::Init)?;
        let model = TetrisModel::new(rng, store);
        log::info!("tetris: created (high score {})", model.high_score);
        Ok(Self {
            machine,
            model,
            info: GameInfo::default(),
        })
    }

    pub fn state(&self) -> TetrisState {
        self.machine.current()
    }

    pub fn model(&self) -> &TetrisModel {
        &self.model
    }

    /// Feed one event, then follow the internal lock and spawn-failure chains
    pub fn dispatch(&mut self, event: TetrisEvent) {
        if self.machine.process_event(&mut self.model, event).is_err() {
            return;
        }
        if std::mem::take(&mut self.model.landed) {
            let _ = self.machine.process_event(&mut self.model, TetrisEvent::Lock);
        }
        if self.model.game_over && self.machine.current() == TetrisState::Spawn {
            let _ = self.machine.update(&mut self.model);
        }
    }

    /// Rebuild the snapshot from the board and the falling piece
    fn project(&mut self) {
        let state = self.machine.current();
        let m = &self.model;
        let info = &mut self.info;

        m.board.write_field(&mut info.field);
        if matches!(state, TetrisState::Spawn | TetrisState::Fall) {
            if let Some(piece) = m.current {
                for (x, y) in piece.cells() {
                    if (0..FIELD_WIDTH as i8).contains(&x) && (0..FIELD_HEIGHT as i8).contains(&y) {
                        info.field[y as usize][x as usize] = piece.kind.code();
                    }
                }
            }
        }

        info.next = match state {
            TetrisState::Init | TetrisState::GameOver => [[EMPTY_CELL; PREVIEW_SIZE]; PREVIEW_SIZE],
            _ => bitmap(m.next.0, m.next.1),
        };
        info.score = m.score;
        info.high_score = m.high_score;
        info.level = m.level;
        info.speed = m.speed;
        info.pause = state == TetrisState::Paused;
    }
}

impl Game for TetrisGame {
    fn input(&mut self, action: UserAction, hold: bool) {
        if let Some(event) = TetrisEvent::from_action(action, hold) {
            self.dispatch(event);
        }
    }

    fn update(&mut self) {
        self.dispatch(TetrisEvent::Tick);
    }

    fn info(&mut self) -> &GameInfo {
        self.project();
        &self.info
    }
}

impl Drop for TetrisGame {
    fn drop(&mut self) {
        self.model.store.save(self.model.high_score);
        log::info!("tetris: destroyed");
    }
}
